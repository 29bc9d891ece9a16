// Copyright 2023 Remi Bernotavicius

use crate::database::models::Unit;
use crate::units::to_base;

/// Outcome of comparing an amount on hand against an amount needed.
///
/// `Incomparable` is not a failure. Quantities in different unit families (grams against cups,
/// or two different countable units) are never guessed at, and callers treat them as
/// non-blocking. Callers should match all three variants rather than collapse this to a bool.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Sufficiency {
    Sufficient,
    Insufficient,
    Incomparable,
}

pub fn has_enough(have_amount: f64, have_unit: Unit, need_amount: f64, need_unit: Unit) -> Sufficiency {
    let (have_base, have_family) = to_base(have_amount, have_unit);
    let (need_base, need_family) = to_base(need_amount, need_unit);

    if have_family != need_family {
        Sufficiency::Incomparable
    } else if have_base >= need_base {
        Sufficiency::Sufficient
    } else {
        Sufficiency::Insufficient
    }
}

#[test]
fn same_unit() {
    assert_eq!(has_enough(6.0, Unit::Whole, 3.0, Unit::Whole), Sufficiency::Sufficient);
    assert_eq!(has_enough(3.0, Unit::Whole, 3.0, Unit::Whole), Sufficiency::Sufficient);
    assert_eq!(has_enough(2.0, Unit::Clove, 4.0, Unit::Clove), Sufficiency::Insufficient);
}

#[test]
fn converted_within_family() {
    assert_eq!(has_enough(1.0, Unit::Kilograms, 500.0, Unit::Grams), Sufficiency::Sufficient);
    assert_eq!(has_enough(1.0, Unit::Pounds, 500.0, Unit::Grams), Sufficiency::Insufficient);
    assert_eq!(has_enough(1.0, Unit::Cups, 3.0, Unit::Tablespoons), Sufficiency::Sufficient);
    assert_eq!(has_enough(1.0, Unit::Teaspoons, 1.0, Unit::Tablespoons), Sufficiency::Insufficient);
}

#[test]
fn incomparable_across_families() {
    assert_eq!(has_enough(1.0, Unit::Jar, 2.0, Unit::Tablespoons), Sufficiency::Incomparable);
    assert_eq!(has_enough(500.0, Unit::Grams, 1.0, Unit::Cups), Sufficiency::Incomparable);
    assert_eq!(has_enough(5.0, Unit::Clove, 1.0, Unit::Head), Sufficiency::Incomparable);
    // Even a zero holding is not "insufficient" when the units cannot be compared.
    assert_eq!(has_enough(0.0, Unit::Bag, 1.0, Unit::Box), Sufficiency::Incomparable);
}

#[test]
fn incomparable_iff_different_family() {
    use crate::units::BaseUnit;

    for have in Unit::iter() {
        for need in Unit::iter() {
            let result = has_enough(1.0, have, 1.0, need);
            let different = BaseUnit::from(have) != BaseUnit::from(need);
            assert_eq!(result == Sufficiency::Incomparable, different, "{have} vs {need}");
        }
    }
}
