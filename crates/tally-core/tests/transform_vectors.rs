//! Counter transform vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tally_core::transform::{self, Op};


fn op_named(name: &str) -> Option<Op> {
    Op::ALL.into_iter().find(|op| op.as_str() == name)
}

#[test]
fn transform_vectors() {
    let files = ["increment.json", "decrement.json", "echo.json", "reset.json"];

    for f in files {
        let v = vector_loader::load(f);
        let op = op_named(&v.op).unwrap_or_else(|| panic!("unknown op {} in {f}", v.op));

        for c in &v.cases {
            let res = op.apply(c.input);

            if let Some(code) = &c.expect_error {
                let e = res.expect_err("expected error");
                assert_eq!(e.client_code().as_str(), code, "vector={} input={}", v.description, c.input);
                continue;
            }

            let out = res.expect("expected ok");
            let ex = c.expect.expect("missing expect");
            assert_eq!(out, ex, "vector={} input={}", v.description, c.input);
        }
    }
}

#[test]
fn successful_ops_stay_in_band_for_admissible_inputs() {
    for v in transform::MIN_VALUE..=transform::MAX_VALUE {
        for op in Op::ALL {
            if let Ok(out) = op.apply(v) {
                assert!(transform::is_admissible(out), "op={} input={v} out={out}", op.as_str());
            }
        }
    }
}

#[test]
fn range_exceeded_message_names_value() {
    let e = transform::increment(20000).unwrap_err();
    assert_eq!(
        e.to_string(),
        "the number 20000 exceeded the allowed range of [-10000, 10000]"
    );
}

#[test]
fn op_names_are_distinct() {
    for op in Op::ALL {
        assert_eq!(op_named(op.as_str()), Some(op));
    }
    assert_eq!(op_named("multiply"), None);
}
