//! Byte-exact diagnostic forms and their agreement with the canonical form.

use std::collections::BTreeSet;

use annotdb_core::serializer::{render, to_canonical, to_diagnostic, Form};
use annotdb_core::{
    DatabaseConfig, DbId, FormalParameter, Matrix, ParamType, Payload, Predicate, ScalarType,
    SchemaRegistry, SubRange, TimeStamp, Value, VocabElement,
};
use annotdb_test_helpers::Fixture;

#[test]
fn integer_matrix_diagnostic() {
    let fx = Fixture::standard();
    let m = Matrix::with_args(&fx.db, fx.int_mve, vec![Value::integer(22)]).expect("valid");
    let expected = format!(
        "(Matrix (mveID {}) (varLen false) (argList ((IntDataValue (id 0) (itsFargID {}) \
         (itsFargType INTEGER) (itsCellID 0) (itsValue 22) (subRange false) (minVal 0) \
         (maxVal 0)))))",
        fx.int_mve,
        fx.farg(fx.int_mve, 0)
    );
    assert_eq!(m.to_diagnostic(), expected);
}

#[test]
fn nested_predicate_diagnostic() {
    let fx = Fixture::standard();
    let nested = Predicate::new(&fx.db, fx.pve0).expect("pve0 resolves");
    let m = Matrix::with_args(&fx.db, fx.pred_mve, vec![Value::predicate(nested)])
        .expect("predicate slot");
    let expected = format!(
        "(Matrix (mveID {mve}) (varLen false) (argList ((PredDataValue (id 0) \
         (itsFargID {val}) (itsFargType PREDICATE) (itsCellID 0) (itsValue \
         (predicate (id 0) (predID {pve}) (predName pve0) (varLen false) (argList \
         ((UndefinedDataValue (id 0) (itsFargID {a1}) (itsFargType UNTYPED) (itsCellID 0) \
         (itsValue <arg1>) (subRange false)), \
         (UndefinedDataValue (id 0) (itsFargID {a2}) (itsFargType UNTYPED) (itsCellID 0) \
         (itsValue <arg2>) (subRange false)))))) (subRange false)))))",
        mve = fx.pred_mve,
        val = fx.farg(fx.pred_mve, 0),
        pve = fx.pve0,
        a1 = fx.farg(fx.pve0, 0),
        a2 = fx.farg(fx.pve0, 1),
    );
    assert_eq!(m.to_diagnostic(), expected);
}

#[test]
fn committed_identities_appear_in_the_diagnostic() {
    let fx = Fixture::standard();
    let nested = Predicate::new(&fx.db, fx.pve0).expect("pve0 resolves");
    let mut m = Matrix::with_args(&fx.db, fx.pred_mve, vec![Value::predicate(nested)])
        .expect("predicate slot");
    let mut next = 500;
    m.commit_to_cell(DbId::new(42), || {
        next += 1;
        DbId::new(next)
    });

    let expected = format!(
        "(Matrix (mveID {mve}) (varLen false) (argList ((PredDataValue (id 501) \
         (itsFargID {val}) (itsFargType PREDICATE) (itsCellID 42) (itsValue \
         (predicate (id 502) (predID {pve}) (predName pve0) (varLen false) (argList \
         ((UndefinedDataValue (id 503) (itsFargID {a1}) (itsFargType UNTYPED) (itsCellID 42) \
         (itsValue <arg1>) (subRange false)), \
         (UndefinedDataValue (id 504) (itsFargID {a2}) (itsFargType UNTYPED) (itsCellID 42) \
         (itsValue <arg2>) (subRange false)))))) (subRange false)))))",
        mve = fx.pred_mve,
        val = fx.farg(fx.pred_mve, 0),
        pve = fx.pve0,
        a1 = fx.farg(fx.pve0, 0),
        a2 = fx.farg(fx.pve0, 1),
    );
    assert_eq!(m.to_diagnostic(), expected);
    assert_eq!(m.to_canonical(), "(pve0(<arg1>, <arg2>))");
}

#[test]
fn diagnostic_parentheses_balance() {
    let fx = Fixture::standard();
    let nested = Predicate::with_args(
        &fx.db,
        fx.pve0,
        vec![Value::float(1.0), Value::predicate(Predicate::new(&fx.db, fx.pve1).expect("pve1"))],
    )
    .expect("untyped slots");
    let m = Matrix::with_args(
        &fx.db,
        fx.mixed_mve,
        vec![
            Value::float(1.0),
            Value::integer(2),
            Value::nominal("a_nominal").expect("valid"),
            Value::predicate(nested),
            Value::quote_string("q-string").expect("valid"),
            Value::time_stamp(TimeStamp::zero(60).expect("valid tps")),
            Value::undefined(),
        ],
    )
    .expect("mixed slots");
    let text = m.to_diagnostic();
    let opens = text.matches('(').count();
    let closes = text.matches(')').count();
    assert_eq!(opens, closes, "{text}");
    assert_eq!(
        m.to_canonical(),
        "(1.0, 2, a_nominal, pve0(1.0, pve1(0)), \"q-string\", 00:00:00:000, <u>)"
    );
}

#[test]
fn render_dispatches_on_form() {
    let fx = Fixture::standard();
    let m = Matrix::new(&fx.db, fx.float_mve).expect("float_mve resolves");
    assert_eq!(render(&m, Form::Canonical), to_canonical(&m));
    assert_eq!(render(&m, Form::Diagnostic), to_diagnostic(&m));
    let v = m.arg(0).expect("non-negative").expect("in range");
    assert_eq!(render(v, Form::Canonical), "0.0");
}

#[test]
fn subranged_values_list_their_bounds() {
    let mut registry = SchemaRegistry::new(DatabaseConfig::default()).expect("valid config");
    let ts_param = FormalParameter::new("<when>", ParamType::TimeStamp)
        .and_then(|p| {
            p.with_subrange(SubRange::TimeStamp {
                min: TimeStamp::new(60, 60).expect("valid tps"),
                max: TimeStamp::new(60, 120).expect("valid tps"),
            })
        })
        .expect("ordered bounds");
    let f_param = FormalParameter::new("<f>", ParamType::Float)
        .and_then(|p| p.with_subrange(SubRange::Float { min: -1.0, max: 1.0 }))
        .expect("ordered bounds");
    let approved: BTreeSet<String> = ["red".to_owned(), "green".to_owned()].into_iter().collect();
    let n_param = FormalParameter::new("<n>", ParamType::Nominal)
        .and_then(|p| p.with_subrange(SubRange::Nominal(approved)))
        .expect("valid nominals");
    let mve = registry
        .register(
            VocabElement::tuple("bounded", ScalarType::Tuple, vec![ts_param, f_param, n_param])
                .expect("well formed"),
        )
        .expect("registers");
    let db = registry.into_shared();

    let m = Matrix::new(&db, mve).expect("bounded resolves");
    assert_eq!(m.to_canonical(), "(00:00:01:000, 0.0, )");
    let args = m.args();
    assert!(to_diagnostic(&args[0]).ends_with(
        "(itsValue (60,00:00:01:000)) (subRange true) (minVal (60,00:00:01:000)) \
         (maxVal (60,00:00:02:000)))"
    ));
    assert!(to_diagnostic(&args[1]).ends_with("(subRange true) (minVal -1.0) (maxVal 1.0))"));
    assert!(to_diagnostic(&args[2]).ends_with("(itsValue <null>) (subRange true))"));

    let mut m = m;
    m.replace_arg(2, Value::nominal("blue").expect("valid")).expect("nominal slot");
    assert_eq!(m.to_canonical(), "(00:00:01:000, 0.0, )");
    m.replace_arg(2, Value::nominal("red").expect("valid")).expect("nominal slot");
    m.replace_arg(1, Value::new(Payload::Float(7.0)).expect("valid")).expect("float slot");
    assert_eq!(m.to_canonical(), "(00:00:01:000, 1.0, red)");
}
