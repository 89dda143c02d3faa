//! The value model (§3): a single closed tagged union `Val` plus the
//! tabular types built out of it. There is no class hierarchy with a
//! shared abstract base the way the original reader had one per scalar
//! kind — the parser and every consumer simply pattern-match on `Val`.

use gridwire_util::ValueError;
use indexmap::IndexMap;

/// A number with an optional unit. `unit` must satisfy
/// [`gridwire_lex::grammar::is_unit`] whenever it is present; the
/// reader enforces that at construction time (§4.5), this type does not
/// re-validate it.
///
/// `PartialEq` treats any two NaN values carrying the same unit as
/// equal — the grid language has exactly one NaN value, so unlike raw
/// IEEE-754 `f64` comparison, `Num::nan() == Num::nan()` holds (§3
/// invariants, §8 property 1).
#[derive(Debug, Clone)]
pub struct Num {
    pub value: f64,
    pub unit: Option<String>,
}

impl Num {
    pub fn new(value: f64, unit: Option<String>) -> Num {
        Num { value, unit }
    }

    pub fn plain(value: f64) -> Num {
        Num { value, unit: None }
    }

    pub fn nan() -> Num {
        Num {
            value: f64::NAN,
            unit: None,
        }
    }

    pub fn pos_inf() -> Num {
        Num {
            value: f64::INFINITY,
            unit: None,
        }
    }

    pub fn neg_inf() -> Num {
        Num {
            value: f64::NEG_INFINITY,
            unit: None,
        }
    }

    pub fn zero() -> Num {
        Num {
            value: 0.0,
            unit: None,
        }
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        let values_eq = if self.value.is_nan() && other.value.is_nan() {
            true
        } else {
            self.value == other.value
        };
        values_eq && self.unit == other.unit
    }
}

/// `y-m-d`, validated as a real calendar date (rejects e.g. `2021-02-30`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// `h:m:s.fraction`, fractional part kept to millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

/// An instant plus, if the source carried a trailing ` IANA_Zone`
/// suffix, that zone's name. Equality accounts for the zone name per the
/// §9 open-question resolution: we keep it rather than discard it.
#[derive(Debug, Clone, PartialEq)]
pub struct DateTime {
    pub instant: chrono::DateTime<chrono::FixedOffset>,
    pub zone: Option<String>,
}

/// A geographic coordinate. Construction validates the range so an
/// out-of-range `Coord` can never exist (§3 invariants).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Result<Coord, ValueError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ValueError::CoordOutOfRange { lat, lon });
        }
        Ok(Coord { lat, lon })
    }
}

/// A `@`-prefixed identifier, with an optional human-readable display
/// name (the `STR` literal that may immediately follow it in source).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ref {
    pub id: String,
    pub name: Option<String>,
}

impl Ref {
    pub fn new(id: impl Into<String>) -> Ref {
        Ref {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Ref {
        self.name = Some(name.into());
        self
    }
}

/// An ordered mapping from identifier keys to values. Insertion order is
/// preserved for round-tripping but, per §3, irrelevant to equality —
/// `IndexMap`'s own `PartialEq` already has that shape, so we reuse it
/// verbatim instead of writing an order-insensitive comparison by hand.
pub type Dict = IndexMap<String, Val>;

/// A single typed cell. Every variant here corresponds to one production
/// of `literal` in the grammar (§4.4); `Grid` is the only recursive case
/// (nested grids).
#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Null,
    Marker,
    Remove,
    Na,
    Bool(bool),
    Num(Num),
    Str(String),
    Uri(String),
    Ref(Ref),
    Symbol(String),
    Date(Date),
    Time(Time),
    DateTime(DateTime),
    Coord(Coord),
    /// `TypeName("payload")`.
    XStr(String, String),
    /// An opaque binary reference carrying its MIME type.
    Bin(String),
    List(Vec<Val>),
    Dict(Dict),
    Grid(Box<Grid>),
}

/// One column of a [`Grid`]: its position (used to index `Row` cells),
/// name, and any tags attached in the column header line.
#[derive(Debug, Clone, PartialEq)]
pub struct Col {
    pub index: usize,
    pub name: String,
    pub meta: Dict,
}

/// A row's length always equals its grid's column count (§3 invariant);
/// the parser is the sole place this is established, by filling in
/// `Val::Null` for every elided cell as it goes (§4.4 row rules).
pub type Row = Vec<Val>;

/// The tabular form: header metadata, typed columns, and rows of
/// heterogeneous typed cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub meta: Dict,
    pub cols: Vec<Col>,
    pub rows: Vec<Row>,
}

impl Grid {
    /// Looks up a column by name, the common way callers index into a
    /// row once they no longer remember the column's position.
    pub fn col(&self, name: &str) -> Option<&Col> {
        self.cols.iter().find(|c| c.name == name)
    }

    pub fn cell<'a>(&self, row: &'a Row, name: &str) -> Option<&'a Val> {
        self.col(name).and_then(|c| row.get(c.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_compares_equal_to_itself() {
        assert_eq!(Num::nan(), Num::nan());
        assert_ne!(Num::nan(), Num::plain(1.0));
    }

    #[test]
    fn coord_rejects_out_of_range() {
        assert!(Coord::new(91.0, 0.0).is_err());
        assert!(Coord::new(0.0, 181.0).is_err());
        assert!(Coord::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn dict_equality_is_insertion_order_insensitive() {
        let mut a = Dict::new();
        a.insert("x".to_string(), Val::Marker);
        a.insert("y".to_string(), Val::Num(Num::plain(1.0)));

        let mut b = Dict::new();
        b.insert("y".to_string(), Val::Num(Num::plain(1.0)));
        b.insert("x".to_string(), Val::Marker);

        assert_eq!(a, b);
    }

    #[test]
    fn row_length_matches_col_count_invariant() {
        let grid = Grid {
            meta: Dict::new(),
            cols: vec![
                Col { index: 0, name: "a".into(), meta: Dict::new() },
                Col { index: 1, name: "b".into(), meta: Dict::new() },
            ],
            rows: vec![vec![Val::Null, Val::Null]],
        };
        for row in &grid.rows {
            assert_eq!(row.len(), grid.cols.len());
        }
    }

    use proptest::prelude::*;

    fn arbitrary_val() -> impl Strategy<Value = Val> {
        prop_oneof![
            Just(Val::Null),
            Just(Val::Marker),
            Just(Val::Remove),
            Just(Val::Na),
            any::<bool>().prop_map(Val::Bool),
            (-1_000.0f64..1_000.0).prop_map(|v| Val::Num(Num::plain(v))),
            "[a-zA-Z0-9 ]{0,8}".prop_map(Val::Str),
        ]
    }

    proptest! {
        /// §3's row/column-count invariant, generated over arbitrary
        /// column counts, row counts, and cell contents rather than one
        /// fixed 2x1 example.
        #[test]
        fn row_length_matches_col_count_for_arbitrary_grids(
            ncols in 1usize..8,
            nrows in 0usize..8,
            cells in prop::collection::vec(arbitrary_val(), 1..64),
        ) {
            let cols: Vec<Col> = (0..ncols)
                .map(|i| Col { index: i, name: format!("c{i}"), meta: Dict::new() })
                .collect();
            let rows: Vec<Row> = (0..nrows)
                .map(|r| {
                    (0..ncols)
                        .map(|c| cells[(r * ncols + c) % cells.len()].clone())
                        .collect()
                })
                .collect();
            let grid = Grid { meta: Dict::new(), cols, rows };
            for row in &grid.rows {
                prop_assert_eq!(row.len(), grid.cols.len());
            }
        }
    }
}
