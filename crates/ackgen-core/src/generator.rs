//! Generation run state.

use std::cell::OnceCell;

use ackgen_model::ShapeGraph;
use tracing::info;

use crate::code::Synthesizer;
use crate::config::GeneratorConfig;
use crate::crd::Crd;
use crate::deriver::{derive_crds, resource_names};
use crate::error::GenerateResult;
use crate::render::{self, Artifacts, Target};
use crate::rename::RenameTable;
use crate::types::{EnumDef, TypeDef, enum_defs, type_defs};

/// One generation run over an immutable shape graph and configuration.
///
/// The rename table, resources, TypeDefs and EnumDefs are each derived on
/// first use and then reused. The memoization uses [`OnceCell`], so a
/// generator is not `Sync`; share it across threads only behind external
/// synchronization.
#[derive(Debug)]
pub struct Generator {
    graph: ShapeGraph,
    config: GeneratorConfig,
    renames: OnceCell<RenameTable>,
    crds: OnceCell<Vec<Crd>>,
    type_defs: OnceCell<Vec<TypeDef>>,
    enum_defs: OnceCell<Vec<EnumDef>>,
}

impl Generator {
    /// Create a generator; nothing is derived yet.
    #[must_use]
    pub fn new(graph: ShapeGraph, config: GeneratorConfig) -> Self {
        Self {
            graph,
            config,
            renames: OnceCell::new(),
            crds: OnceCell::new(),
            type_defs: OnceCell::new(),
            enum_defs: OnceCell::new(),
        }
    }

    /// The shape graph.
    #[must_use]
    pub fn graph(&self) -> &ShapeGraph {
        &self.graph
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Conflict-free type names.
    #[must_use]
    pub fn renames(&self) -> &RenameTable {
        self.renames.get_or_init(|| {
            let names = resource_names(&self.graph, &self.config);
            RenameTable::build(&self.graph, &self.config, &names)
        })
    }

    /// Derived resources, sorted by name.
    pub fn crds(&self) -> GenerateResult<&[Crd]> {
        if let Some(crds) = self.crds.get() {
            return Ok(crds);
        }
        let crds = derive_crds(&self.graph, &self.config, self.renames())?;
        info!(count = crds.len(), "derived resources");
        Ok(self.crds.get_or_init(|| crds))
    }

    /// The resource with the given original name.
    pub fn crd(&self, name: &str) -> GenerateResult<Option<&Crd>> {
        Ok(self.crds()?.iter().find(|c| c.names.original == name))
    }

    /// Nested type definitions reachable from resource fields, sorted by name.
    pub fn type_defs(&self) -> GenerateResult<&[TypeDef]> {
        if let Some(defs) = self.type_defs.get() {
            return Ok(defs);
        }
        let defs = type_defs(&self.graph, &self.config, self.renames(), self.crds()?)?;
        Ok(self.type_defs.get_or_init(|| defs))
    }

    /// String enum definitions, sorted by name.
    #[must_use]
    pub fn enum_defs(&self) -> &[EnumDef] {
        self.enum_defs
            .get_or_init(|| enum_defs(&self.graph, &self.config, self.renames()))
    }

    /// Code synthesizer for one of this generator's resources.
    #[must_use]
    pub fn synthesizer<'a>(&'a self, crd: &'a Crd) -> Synthesizer<'a> {
        Synthesizer::new(&self.graph, &self.config, self.renames(), crd)
    }

    /// Render every target.
    pub fn generate_all(&self) -> GenerateResult<Artifacts> {
        self.generate(&Target::ALL)
    }

    /// Render the given targets into one path-keyed artifact map.
    ///
    /// Fails on the first error without returning partial output.
    pub fn generate(&self, targets: &[Target]) -> GenerateResult<Artifacts> {
        let mut artifacts = Artifacts::new();
        for target in targets {
            let files = match target {
                Target::Apis => render::apis(self)?,
                Target::Sdk => render::sdk(self)?,
            };
            artifacts.extend(files);
        }
        info!(files = artifacts.len(), "rendered artifacts");
        Ok(artifacts)
    }
}
