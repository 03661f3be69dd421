//! Path-derived variable names.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Member(usize),
    Elem,
}

/// Position of a value in the shape tree, counted from the operation root.
///
/// Every intermediate variable the synthesizer introduces is named after the
/// path it converts, so identical inputs always produce identical names and
/// no two live bindings can share one. A member step renders as `f{index}`
/// and a container element step as `elem`; suffixes (`val`, `iter`, `key`,
/// `map`) never start with `f` or `e`, which keeps the encoding injective.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarPath(Vec<Step>);

impl VarPath {
    /// The operation root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// The `index`-th declared member below this path.
    #[must_use]
    pub fn member(&self, index: usize) -> Self {
        self.push(Step::Member(index))
    }

    /// The element of the container at this path.
    #[must_use]
    pub fn elem(&self) -> Self {
        self.push(Step::Elem)
    }

    /// Variable holding the value built for this path.
    #[must_use]
    pub fn val(&self) -> String {
        format!("{self}val")
    }

    /// Loop binding over the container at this path.
    #[must_use]
    pub fn iter_var(&self) -> String {
        format!("{self}iter")
    }

    /// Key binding of a map iteration at this path.
    #[must_use]
    pub fn key_var(&self) -> String {
        format!("{self}key")
    }

    /// Outer binding when iterating the flattened map form.
    #[must_use]
    pub fn map_var(&self) -> String {
        format!("{self}map")
    }

    fn push(&self, step: Step) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }
}

impl fmt::Display for VarPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.0 {
            match step {
                Step::Member(index) => write!(f, "f{index}")?,
                Step::Elem => f.write_str("elem")?,
            }
        }
        Ok(())
    }
}
