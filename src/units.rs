// Copyright 2023 Remi Bernotavicius

use crate::database::models::Unit;

/// The family a quantity is compared within once it has been converted to base units.
///
/// Mass quantities are held in grams and volume quantities in millilitres. Countable units have
/// no conversion at all, so they only ever match the exact same unit.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub enum BaseUnit {
    Mass,
    Volume,
    Count(Unit),
}

impl From<Unit> for BaseUnit {
    fn from(u: Unit) -> Self {
        match u {
            Unit::Grams | Unit::Kilograms | Unit::Ounces | Unit::Pounds => Self::Mass,
            Unit::Milliliters
            | Unit::Liters
            | Unit::Cups
            | Unit::Tablespoons
            | Unit::Teaspoons => Self::Volume,
            countable => Self::Count(countable),
        }
    }
}

fn as_grams(u: Unit) -> f64 {
    match u {
        Unit::Grams => 1.0,
        Unit::Kilograms => 1_000.0,
        Unit::Ounces => 28.3495,
        Unit::Pounds => 453.592,
        _ => unreachable!(),
    }
}

fn as_milliliters(u: Unit) -> f64 {
    match u {
        Unit::Milliliters => 1.0,
        Unit::Liters => 1_000.0,
        Unit::Cups => 240.0,
        Unit::Tablespoons => 14.787,
        Unit::Teaspoons => 4.929,
        _ => unreachable!(),
    }
}

/// How many base units one of `u` is worth.
pub fn scale(u: Unit) -> f64 {
    match BaseUnit::from(u) {
        BaseUnit::Mass => as_grams(u),
        BaseUnit::Volume => as_milliliters(u),
        BaseUnit::Count(_) => 1.0,
    }
}

pub fn to_base(amount: f64, unit: Unit) -> (f64, BaseUnit) {
    (amount * scale(unit), BaseUnit::from(unit))
}

pub fn from_base(base_amount: f64, unit: Unit) -> f64 {
    base_amount / scale(unit)
}

/// Amounts are stored and reported with at most three decimal places.
pub fn round3(amount: f64) -> f64 {
    (amount * 1_000.0).round() / 1_000.0
}

#[test]
fn unit_families() {
    assert_eq!(BaseUnit::from(Unit::Pounds), BaseUnit::Mass);
    assert_eq!(BaseUnit::from(Unit::Teaspoons), BaseUnit::Volume);
    assert_eq!(BaseUnit::from(Unit::Clove), BaseUnit::Count(Unit::Clove));
    assert_ne!(BaseUnit::from(Unit::Clove), BaseUnit::from(Unit::Whole));
}

#[test]
fn unit_conversion_to_base() {
    assert_eq!(to_base(2.0, Unit::Kilograms), (2_000.0, BaseUnit::Mass));
    assert_eq!(to_base(1.0, Unit::Pounds), (453.592, BaseUnit::Mass));
    assert_eq!(to_base(2.0, Unit::Cups), (480.0, BaseUnit::Volume));
    assert_eq!(to_base(3.0, Unit::Tablespoons).1, BaseUnit::Volume);
    assert_eq!(to_base(4.0, Unit::Jar), (4.0, BaseUnit::Count(Unit::Jar)));

    assert_eq!(from_base(480.0, Unit::Cups), 2.0);
    assert_eq!(from_base(1_500.0, Unit::Kilograms), 1.5);
    assert_eq!(from_base(7.0, Unit::Piece), 7.0);
}

#[test]
fn unit_conversion_round_trip() {
    for unit in Unit::iter() {
        for x in [0.0, 0.001, 0.25, 1.0, 3.5, 17.0, 1234.5678] {
            let (base, _) = to_base(x, unit);
            let back = from_base(base, unit);
            assert!((back - x).abs() < 1e-6, "{x} {unit} came back as {back}");
        }
    }
}

#[test]
fn rounding() {
    assert_eq!(round3(0.1 + 0.2), 0.3);
    assert_eq!(round3(2.34567), 2.346);
    assert_eq!(round3(5.0), 5.0);
}
