//! Identifier case variants.
//!
//! Every shape member, resource and type gets a [`Names`] bundle: the
//! original descriptor spelling plus Camel, lowerCamel and snake_case forms.
//! Camel forms upper-case well-known initialisms (`QueueUrl` -> `QueueURL`).

use heck::ToSnakeCase;

/// Words rendered fully upper-case in Camel forms.
const INITIALISMS: &[&str] = &[
    "acl", "acp", "api", "arn", "aws", "db", "dns", "ebs", "ec2", "ecr", "efs", "eks", "html",
    "http", "https", "id", "jwt", "json", "kms", "mfa", "sdk", "sqs", "sse", "ssl", "tcp", "tls",
    "udp", "uri", "url", "vpc", "waf", "xml", "yaml",
];

/// Rust keywords that need raw-identifier escaping as field names.
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "yield",
];

/// Case variants of one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Names {
    /// Spelling as found in the descriptor or configuration.
    pub original: String,
    /// Exported type-style name (`KMSMasterKeyID`).
    pub camel: String,
    /// lowerCamel name used for serialized keys (`kmsMasterKeyID`).
    pub camel_lower: String,
    /// snake_case name (`kms_master_key_id`).
    pub snake: String,
}

impl Names {
    /// Compute all variants of `original`.
    #[must_use]
    pub fn new(original: &str) -> Self {
        let snake = original.to_snake_case();
        let words: Vec<&str> = snake.split('_').filter(|w| !w.is_empty()).collect();

        let camel: String = words.iter().map(|w| camel_word(original, w)).collect();
        let camel_lower: String = words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { (*w).to_owned() } else { camel_word(original, w) })
            .collect();

        Self {
            original: original.to_owned(),
            camel,
            camel_lower,
            snake,
        }
    }

    /// snake_case name usable as a Rust field identifier.
    #[must_use]
    pub fn field_ident(&self) -> String {
        if RUST_KEYWORDS.contains(&self.snake.as_str()) {
            format!("r#{}", self.snake)
        } else {
            self.snake.clone()
        }
    }
}

fn camel_word(original: &str, word: &str) -> String {
    let upper = word.to_ascii_uppercase();
    // Acronym runs spelled upper-case in the original stay upper-case.
    if INITIALISMS.contains(&word) || (word.len() > 1 && original.contains(&upper)) {
        return upper;
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
