//! Fixture schema databases shared by the annotdb test suites.
//!
//! [`Fixture::standard`] registers one schema of every shape the engine
//! distinguishes and freezes the registry into a shared handle. Tests refer
//! to schemas by the fields of [`Fixture`] and to parameters through
//! [`Fixture::farg`].

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use annotdb_core::{
    DatabaseConfig, DbId, DbRef, FormalParameter, ParamType, ScalarType, SchemaRegistry,
    SubRange, VocabElement,
};

/// A registered set of schemas.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Shared database handle.
    pub db: DbRef,
    /// `float_mve(<val>: float)`
    pub float_mve: DbId,
    /// `int_mve(<val>: integer)`
    pub int_mve: DbId,
    /// `nominal_mve(<val>: nominal)`
    pub nominal_mve: DbId,
    /// `text_mve(<val>: text string)`
    pub text_mve: DbId,
    /// `pred_mve(<val>: predicate)`
    pub pred_mve: DbId,
    /// `untyped_mve(<p0>, <p1>)`, both untyped.
    pub untyped_mve: DbId,
    /// One slot of every non-text type, in declaration order:
    /// `<f> <i> <n> <p> <q> <t> <u>`.
    pub mixed_mve: DbId,
    /// `bounded_mve(<val>: integer in 1..=10)`
    pub bounded_mve: DbId,
    /// Variable-length `list_mve(<head>: integer, <rest>: untyped)`.
    pub list_mve: DbId,
    /// `pve0(<arg1>, <arg2>)`, both untyped.
    pub pve0: DbId,
    /// `pve1(<x>: integer)`
    pub pve1: DbId,
    /// Variable-length `pve_list(<item>)`, untyped.
    pub pve_list: DbId,
}

fn param(name: &str, ty: ParamType) -> FormalParameter {
    FormalParameter::new(name, ty).expect("fixture parameter names are valid")
}

fn tuple(name: &str, scalar: ScalarType, params: Vec<FormalParameter>) -> VocabElement {
    VocabElement::tuple(name, scalar, params).expect("fixture tuple-schemas are well formed")
}

fn predicate(name: &str, params: Vec<FormalParameter>) -> VocabElement {
    VocabElement::predicate(name, params).expect("fixture predicate-schemas are well formed")
}

impl Fixture {
    /// Registers the standard schemas with the default configuration.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_config(DatabaseConfig::default())
    }

    /// Registers the standard schemas with `config`.
    #[must_use]
    pub fn with_config(config: DatabaseConfig) -> Self {
        let mut registry = SchemaRegistry::new(config).expect("fixture config is valid");
        let mut register = |element: VocabElement| {
            registry
                .register(element)
                .expect("fixture schema names are unique")
        };

        let pve0 = register(predicate(
            "pve0",
            vec![param("<arg1>", ParamType::Untyped), param("<arg2>", ParamType::Untyped)],
        ));
        let pve1 = register(predicate("pve1", vec![param("<x>", ParamType::Integer)]));
        let pve_list = register(
            predicate("pve_list", vec![param("<item>", ParamType::Untyped)]).variable_length(true),
        );

        let float_mve = register(tuple(
            "float_mve",
            ScalarType::Float,
            vec![param("<val>", ParamType::Float)],
        ));
        let int_mve = register(tuple(
            "int_mve",
            ScalarType::Integer,
            vec![param("<val>", ParamType::Integer)],
        ));
        let nominal_mve = register(tuple(
            "nominal_mve",
            ScalarType::Nominal,
            vec![param("<val>", ParamType::Nominal)],
        ));
        let text_mve = register(tuple(
            "text_mve",
            ScalarType::Text,
            vec![param("<val>", ParamType::TextString)],
        ));
        let pred_mve = register(tuple(
            "pred_mve",
            ScalarType::Predicate,
            vec![param("<val>", ParamType::Predicate)],
        ));
        let untyped_mve = register(tuple(
            "untyped_mve",
            ScalarType::Tuple,
            vec![param("<p0>", ParamType::Untyped), param("<p1>", ParamType::Untyped)],
        ));
        let mixed_mve = register(tuple(
            "mixed_mve",
            ScalarType::Tuple,
            vec![
                param("<f>", ParamType::Float),
                param("<i>", ParamType::Integer),
                param("<n>", ParamType::Nominal),
                param("<p>", ParamType::Predicate),
                param("<q>", ParamType::QuoteString),
                param("<t>", ParamType::TimeStamp),
                param("<u>", ParamType::Untyped),
            ],
        ));
        let bounded = param("<val>", ParamType::Integer)
            .with_subrange(SubRange::Integer { min: 1, max: 10 })
            .expect("fixture subrange is ordered");
        let bounded_mve = register(tuple("bounded_mve", ScalarType::Integer, vec![bounded]));
        let list_mve = register(
            tuple(
                "list_mve",
                ScalarType::Tuple,
                vec![param("<head>", ParamType::Integer), param("<rest>", ParamType::Untyped)],
            )
            .variable_length(true),
        );

        Self {
            db: registry.into_shared(),
            float_mve,
            int_mve,
            nominal_mve,
            text_mve,
            pred_mve,
            untyped_mve,
            mixed_mve,
            bounded_mve,
            list_mve,
            pve0,
            pve1,
            pve_list,
        }
    }

    /// The schema with identity `id`, of either kind.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not one of the fixture's schemas.
    #[must_use]
    pub fn schema(&self, id: DbId) -> &VocabElement {
        self.db
            .resolve_tuple_schema(id)
            .or_else(|_| self.db.resolve_predicate_schema(id))
            .expect("fixture schema is registered")
    }

    /// Identity of parameter `index` of schema `id`.
    ///
    /// # Panics
    ///
    /// Panics if the schema or the parameter does not exist.
    #[must_use]
    pub fn farg(&self, id: DbId, index: usize) -> DbId {
        self.schema(id)
            .parameters()
            .get(index)
            .map(FormalParameter::id)
            .expect("fixture parameter exists")
    }
}
