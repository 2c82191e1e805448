//! One resolved formula, many rows and threads.

use formula::{Bindings, Engine, Value, ValueKind, evaluator};
use std::sync::Arc;
use std::thread;

#[macro_use]
mod cases;

#[test]
fn reevaluation_is_bit_identical() {
    let engine = cases::engine();
    let row = cases::row();
    let formula = engine
        .compile("str(sqrt([real]) * pi) + [name] + [gap] / 3", &row)
        .unwrap();
    let first = formula.run(&row).unwrap();
    assert_eq!(first, Value::string("4.967Ada"));
    for _ in 0..3 {
        assert_eq!(formula.run(&row).unwrap(), first);
    }
}

#[test]
fn one_tree_many_rows() {
    let engine = Engine::default();
    let mut row = Bindings::new();
    row.declare("price", ValueKind::Double);
    row.declare("quantity", ValueKind::Integer);

    let formula = engine
        .compile("if([quantity] > 10, [price] * 0.9, [price]) * [quantity]", &row)
        .unwrap();
    assert_eq!(formula.kind(), ValueKind::Double);

    let mut totals = Vec::new();
    for (price, quantity) in [(2.0, 5.0), (2.0, 20.0), (f64::NAN, 1.0)] {
        row.set("price", Value::double(price)).unwrap();
        row.set("quantity", Value::integer(quantity)).unwrap();
        totals.push(formula.run(&row).unwrap());
    }
    assert_eq!(
        totals,
        vec![
            Value::double(10.0),
            Value::double(36.0),
            Value::missing(ValueKind::Double),
        ]
    );
}

#[test]
fn shared_tree_across_threads() {
    let engine = Engine::default();
    let mut declared = Bindings::new();
    declared.declare("n", ValueKind::Integer);
    let typed = Arc::new(
        engine
            .compile("[n] * [n] + 1", &declared)
            .unwrap()
            .into_typed_expr(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let typed = Arc::clone(&typed);
            thread::spawn(move || {
                let engine = Engine::default();
                let row = Bindings::new().with("n", Value::integer(i as f64));
                let context = engine.context(&row);
                evaluator::eval(&typed, &context).unwrap()
            })
        })
        .collect();

    let results: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        results,
        vec![
            Value::integer(1.0),
            Value::integer(2.0),
            Value::integer(5.0),
            Value::integer(10.0),
        ]
    );
}
