//! Matrix construction, access and mutation against the fixture schemas.

use annotdb_core::{
    same_db, DbId, EngineError, Matrix, ParamType, Payload, Predicate, SchemaRegistry,
    TimeStamp, Value, ValueKind,
};
use annotdb_test_helpers::Fixture;

// =============================================================================
// Construction
// =============================================================================

#[test]
fn empty_float_matrix_renders_zero() {
    let fx = Fixture::standard();
    let m = Matrix::new(&fx.db, fx.float_mve).expect("float_mve resolves");
    assert_eq!(m.to_canonical(), "(0.0)");
    assert_eq!(m.num_args(), 1);
    assert_eq!(m.mve_id(), fx.float_mve);
    assert!(!m.var_len());
    assert!(same_db(m.db(), &fx.db));
}

#[test]
fn bound_integer_construction() {
    let fx = Fixture::standard();
    let farg = fx.farg(fx.int_mve, 0);
    let v = Value::bound(&fx.db, farg, Payload::Integer(22)).expect("integer slot");
    let m = Matrix::with_args(&fx.db, fx.int_mve, vec![v]).expect("valid list");
    assert_eq!(m.to_canonical(), "(22)");
    assert_eq!(m.to_string(), "(22)");
}

#[test]
fn default_values_follow_declared_types() {
    let fx = Fixture::standard();
    let m = Matrix::new(&fx.db, fx.mixed_mve).expect("mixed_mve resolves");
    let kinds: Vec<_> = m.args().iter().map(Value::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ValueKind::Float,
            ValueKind::Integer,
            ValueKind::Nominal,
            ValueKind::Predicate,
            ValueKind::QuoteString,
            ValueKind::TimeStamp,
            ValueKind::Undefined,
        ]
    );
    assert_eq!(m.to_canonical(), "(0.0, 0, , (), \"\", 00:00:00:000, <u>)");
    for (i, arg) in m.args().iter().enumerate() {
        assert_eq!(arg.farg_id(), fx.farg(fx.mixed_mve, i));
    }
    let ts = m.arg(5).expect("non-negative").and_then(Value::as_time_stamp);
    assert_eq!(ts.map(|t| t.ticks_per_second()), Some(60));
}

#[test]
fn unknown_schema_is_rejected() {
    let fx = Fixture::standard();
    assert_eq!(
        Matrix::new(&fx.db, DbId::new(9_999)).unwrap_err(),
        EngineError::UnknownSchema(DbId::new(9_999))
    );
    assert_eq!(
        Matrix::new(&fx.db, DbId::INVALID).unwrap_err(),
        EngineError::UnknownSchema(DbId::INVALID)
    );
    // A predicate-schema is not a tuple-schema.
    assert_eq!(
        Matrix::new(&fx.db, fx.pve0).unwrap_err(),
        EngineError::UnknownSchema(fx.pve0)
    );
}

#[test]
fn construction_checks_length() {
    let fx = Fixture::standard();
    assert_eq!(
        Matrix::with_args(&fx.db, fx.untyped_mve, vec![]).unwrap_err(),
        EngineError::LengthMismatch {
            expected: 2,
            found: 0
        }
    );
    assert_eq!(
        Matrix::with_args(
            &fx.db,
            fx.untyped_mve,
            vec![Value::integer(1), Value::integer(2), Value::integer(3)]
        )
        .unwrap_err(),
        EngineError::LengthMismatch {
            expected: 2,
            found: 3
        }
    );
}

#[test]
fn construction_checks_types() {
    let fx = Fixture::standard();
    let err = Matrix::with_args(&fx.db, fx.float_mve, vec![Value::integer(1)]).unwrap_err();
    assert_eq!(
        err,
        EngineError::TypeMismatch {
            expected: ParamType::Float,
            found: ValueKind::Integer
        }
    );

    let text = Value::text_string("free text").expect("valid text");
    let err = Matrix::with_args(&fx.db, fx.untyped_mve, vec![Value::integer(1), text.clone()])
        .unwrap_err();
    assert!(matches!(err, EngineError::TypeMismatch { .. }));

    let m = Matrix::with_args(&fx.db, fx.text_mve, vec![text]).expect("text slot");
    assert_eq!(m.to_canonical(), "(free text)");
}

#[test]
fn construction_stamps_unset_identities() {
    let fx = Fixture::standard();
    let m = Matrix::with_args(
        &fx.db,
        fx.untyped_mve,
        vec![Value::float(1.5), Value::nominal("a_nominal").expect("valid")],
    )
    .expect("untyped slots");
    for i in 0..2 {
        let arg = m.arg(i).expect("non-negative").expect("in range");
        assert_eq!(arg.farg_id(), fx.farg(fx.untyped_mve, i as usize));
        assert_eq!(arg.farg_type(), Some(ParamType::Untyped));
    }
}

#[test]
fn construction_rejects_foreign_bindings() {
    let fx = Fixture::standard();
    let p1 = fx.farg(fx.untyped_mve, 1);
    let v = Value::bound(&fx.db, p1, Payload::Integer(3)).expect("untyped slot");
    let err = Matrix::with_args(&fx.db, fx.untyped_mve, vec![v, Value::integer(4)]).unwrap_err();
    assert_eq!(
        err,
        EngineError::IdentityMismatch {
            expected: fx.farg(fx.untyped_mve, 0),
            found: p1
        }
    );
}

#[test]
fn subranges_clamp_on_construction() {
    let fx = Fixture::standard();
    let m = Matrix::with_args(&fx.db, fx.bounded_mve, vec![Value::integer(42)])
        .expect("integer slot");
    assert_eq!(m.to_canonical(), "(10)");
    let m = Matrix::new(&fx.db, fx.bounded_mve).expect("bounded_mve resolves");
    assert_eq!(m.to_canonical(), "(1)");
}

#[test]
fn empty_text_equals_the_default() {
    let fx = Fixture::standard();
    let defaulted = Matrix::new(&fx.db, fx.text_mve).expect("text_mve resolves");
    let explicit = Matrix::with_args(
        &fx.db,
        fx.text_mve,
        vec![Value::text_string("").expect("valid text")],
    )
    .expect("text slot");
    assert_eq!(explicit, defaulted);
    assert_eq!(explicit.to_diagnostic(), defaulted.to_diagnostic());
    assert!(explicit.to_diagnostic().contains("(itsValue <null>)"));
}

// =============================================================================
// Access
// =============================================================================

#[test]
fn reads_past_the_end_are_misses() {
    let fx = Fixture::standard();
    let m = Matrix::new(&fx.db, fx.untyped_mve).expect("untyped_mve resolves");
    assert!(m.arg(2).expect("non-negative").is_none());
    assert!(m.arg_copy(17).expect("non-negative").is_none());
    assert_eq!(m.arg(-1).unwrap_err(), EngineError::Index(-1));
    assert_eq!(m.arg_copy(-1).unwrap_err(), EngineError::Index(-1));
}

#[test]
fn arg_copy_is_independent() {
    let fx = Fixture::standard();
    let m = Matrix::with_args(&fx.db, fx.int_mve, vec![Value::integer(7)]).expect("valid");
    let mut copy = m.arg_copy(0).expect("non-negative").expect("in range");
    copy.set_payload(Payload::Integer(8)).expect("same variant");
    assert_eq!(m.to_canonical(), "(7)");
    assert_eq!(copy.as_integer(), Some(8));
}

#[test]
fn lookup_schema_for_parameter() {
    let fx = Fixture::standard();
    let m = Matrix::new(&fx.db, fx.int_mve).expect("int_mve resolves");
    let owner = m
        .lookup_schema_for_parameter(fx.farg(fx.untyped_mve, 1))
        .expect("tuple-schema parameter");
    assert_eq!(owner.id(), fx.untyped_mve);

    for farg in [DbId::INVALID, DbId::new(9_999), fx.farg(fx.pve0, 0)] {
        assert_eq!(
            m.lookup_schema_for_parameter(farg).map(|s| s.id()),
            Err(EngineError::UnknownParameter(farg))
        );
    }
}

// =============================================================================
// Mutation
// =============================================================================

#[test]
fn farg_mismatch_on_replace() {
    let fx = Fixture::standard();
    let mut m = Matrix::new(&fx.db, fx.untyped_mve).expect("untyped_mve resolves");
    let p1 = fx.farg(fx.untyped_mve, 1);
    let v = Value::bound(&fx.db, p1, Payload::Integer(5)).expect("untyped slot");

    let before = m.to_diagnostic();
    assert_eq!(
        m.replace_arg(0, v.clone()).unwrap_err(),
        EngineError::IdentityMismatch {
            expected: fx.farg(fx.untyped_mve, 0),
            found: p1
        }
    );
    assert_eq!(m.to_diagnostic(), before);

    m.replace_arg(1, v.clone()).expect("matching slot");
    assert_eq!(m.arg(1).expect("non-negative"), Some(&v));
    assert_eq!(m.to_canonical(), "(<p0>, 5)");
}

#[test]
fn replace_checks_bounds_and_types() {
    let fx = Fixture::standard();
    let mut m = Matrix::new(&fx.db, fx.untyped_mve).expect("untyped_mve resolves");
    assert_eq!(
        m.replace_arg(-1, Value::integer(1)).unwrap_err(),
        EngineError::Index(-1)
    );
    assert_eq!(
        m.replace_arg(2, Value::integer(1)).unwrap_err(),
        EngineError::Index(2)
    );
    let text = Value::text_string("nope").expect("valid text");
    assert!(matches!(
        m.replace_arg(0, text).unwrap_err(),
        EngineError::TypeMismatch {
            expected: ParamType::Untyped,
            found: ValueKind::TextString
        }
    ));
    assert_eq!(m.to_canonical(), "(<p0>, <p1>)");
}

#[test]
fn untyped_slots_accept_every_variant_but_text() {
    let fx = Fixture::standard();
    let nested = Predicate::new(&fx.db, fx.pve0).expect("pve0 resolves");
    let candidates = vec![
        Value::float(1.0),
        Value::integer(2),
        Value::nominal("a_nominal").expect("valid"),
        Value::predicate(nested),
        Value::quote_string("q-string").expect("valid"),
        Value::time_stamp(TimeStamp::zero(60).expect("valid tps")),
        Value::undefined(),
    ];
    let mut m = Matrix::new(&fx.db, fx.untyped_mve).expect("untyped_mve resolves");
    for v in candidates {
        let kind = v.kind();
        let result = m.replace_arg(0, v);
        assert!(result.is_ok(), "{kind} rejected: {result:?}");
    }
}

#[test]
fn replaced_placeholder_takes_the_parameter_name() {
    let fx = Fixture::standard();
    let mut m = Matrix::with_args(
        &fx.db,
        fx.untyped_mve,
        vec![Value::integer(1), Value::integer(2)],
    )
    .expect("untyped slots");
    m.replace_arg(1, Value::undefined()).expect("untyped slot");
    assert_eq!(m.arg(1).expect("non-negative").and_then(Value::as_str), Some("<p1>"));
    assert_eq!(m.to_canonical(), "(1, <p1>)");
}

#[test]
fn replacement_is_reflected_in_both_forms() {
    let fx = Fixture::standard();
    let mut m = Matrix::new(&fx.db, fx.float_mve).expect("float_mve resolves");
    let diagnostic = m.to_diagnostic();
    m.replace_arg(0, Value::float(2.5)).expect("float slot");
    assert_eq!(m.to_canonical(), "(2.5)");
    assert_ne!(m.to_diagnostic(), diagnostic);
    assert!(m.to_diagnostic().contains("(itsValue 2.5)"));
}

// =============================================================================
// Variable length
// =============================================================================

#[test]
fn variable_length_lists_bind_extras_to_the_final_parameter() {
    let fx = Fixture::standard();
    let m = Matrix::with_args(
        &fx.db,
        fx.list_mve,
        vec![Value::integer(1), Value::float(2.0), Value::float(3.0)],
    )
    .expect("variable-length list");
    assert!(m.var_len());
    let rest = fx.farg(fx.list_mve, 1);
    assert_eq!(m.arg(2).expect("non-negative").map(Value::farg_id), Some(rest));

    assert_eq!(
        Matrix::with_args(&fx.db, fx.list_mve, vec![Value::integer(1)]).unwrap_err(),
        EngineError::LengthMismatch {
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn append_grows_only_variable_length_matrices() {
    let fx = Fixture::standard();
    let mut list = Matrix::new(&fx.db, fx.list_mve).expect("list_mve resolves");
    list.append_arg(Value::nominal("more").expect("valid")).expect("variable length");
    assert_eq!(list.num_args(), 3);
    assert_eq!(list.to_canonical(), "(0, <rest>, more)");
    assert!(list.append_arg(Value::text_string("x").expect("valid")).is_err());
    assert_eq!(list.num_args(), 3);

    let mut fixed = Matrix::new(&fx.db, fx.int_mve).expect("int_mve resolves");
    assert_eq!(
        fixed.append_arg(Value::integer(1)).unwrap_err(),
        EngineError::LengthMismatch {
            expected: 1,
            found: 2
        }
    );
}

// =============================================================================
// Copy and commit
// =============================================================================

#[test]
fn copies_are_deep() {
    let fx = Fixture::standard();
    let nested = Predicate::with_args(
        &fx.db,
        fx.pve0,
        vec![Value::integer(1), Value::undefined()],
    )
    .expect("untyped slots");
    let original = Matrix::with_args(&fx.db, fx.pred_mve, vec![Value::predicate(nested)])
        .expect("predicate slot");
    let mut copy = original.clone();

    assert_eq!(copy, original);
    assert!(same_db(copy.db(), original.db()));
    assert_eq!(copy.to_canonical(), original.to_canonical());
    assert_eq!(copy.to_diagnostic(), original.to_diagnostic());

    copy.replace_arg(0, Value::empty_predicate()).expect("predicate slot");
    assert_eq!(original.to_canonical(), "(pve0(1, <arg2>))");
    assert_eq!(copy.to_canonical(), "(())");
}

#[test]
fn commit_stamps_identities_depth_first() {
    let fx = Fixture::standard();
    let nested = Predicate::new(&fx.db, fx.pve0).expect("pve0 resolves");
    let mut m = Matrix::with_args(&fx.db, fx.pred_mve, vec![Value::predicate(nested)])
        .expect("predicate slot");

    let mut next = 500;
    m.commit_to_cell(DbId::new(42), || {
        next += 1;
        DbId::new(next)
    });

    let outer = m.arg(0).expect("non-negative").expect("in range");
    assert_eq!(outer.id(), DbId::new(501));
    assert_eq!(outer.cell_id(), DbId::new(42));
    let inner = outer.as_predicate().expect("non-empty predicate");
    assert_eq!(inner.id(), DbId::new(502));
    let ids: Vec<_> = inner.args().iter().map(|v| (v.id(), v.cell_id())).collect();
    assert_eq!(
        ids,
        vec![
            (DbId::new(503), DbId::new(42)),
            (DbId::new(504), DbId::new(42))
        ]
    );
}

#[test]
fn nested_predicates_must_share_the_database() {
    let fx = Fixture::standard();
    let other = Fixture::standard();
    let foreign = Predicate::new(&other.db, other.pve0).expect("pve0 resolves");
    let err = Matrix::with_args(&fx.db, fx.pred_mve, vec![Value::predicate(foreign)])
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));

    let empty = SchemaRegistry::default().into_shared();
    assert!(Matrix::new(&empty, fx.pred_mve).is_err());
}
