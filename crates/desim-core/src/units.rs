//! Virtual time units. All values are signed, following the convention that a
//! time arithmetic result may be negative and must be rejected at the
//! scheduling boundary rather than silently clamped. [`Nanosecs`] is the
//! scheduler's native resolution; the coarser units exist so callers can
//! write `Secs::new(5)` the way scenario code does, and convert losslessly.

macro_rules! unit {
    ($name: ident) => {
        #[derive(
            Debug,
            Default,
            Copy,
            Clone,
            PartialOrd,
            Ord,
            PartialEq,
            Eq,
            Hash,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
            derive_more::SubAssign,
            derive_more::Sum,
            derive_more::FromStr,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(i64);

        impl $name {
            pub const ZERO: $name = Self::new(0);
            pub const ONE: $name = Self::new(1);
            pub const MAX: $name = Self::new(i64::MAX);

            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn into_i64(self) -> i64 {
                self.0
            }

            pub const fn is_negative(self) -> bool {
                self.0 < 0
            }

            /// Addition that pins at `MAX`/`MIN` instead of wrapping.
            pub const fn saturating_add(self, rhs: Self) -> Self {
                Self(self.0.saturating_add(rhs.0))
            }
        }
    };
}

macro_rules! convert {
    ($from: ident => $to: ident, $factor: expr) => {
        impl From<$from> for $to {
            fn from(value: $from) -> Self {
                // Saturate rather than wrap: a coarse-unit extreme stays an
                // extreme in the finer unit.
                Self::new(value.into_i64().saturating_mul($factor))
            }
        }
    };
}

unit!(Nanosecs);

impl std::fmt::Display for Nanosecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

unit!(Microsecs);

impl std::fmt::Display for Microsecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}us", self.0)
    }
}

unit!(Millisecs);

impl std::fmt::Display for Millisecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

unit!(Secs);

impl std::fmt::Display for Secs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

convert!(Microsecs => Nanosecs, 1_000);
convert!(Millisecs => Nanosecs, 1_000_000);
convert!(Secs => Nanosecs, 1_000_000_000);
convert!(Millisecs => Microsecs, 1_000);
convert!(Secs => Microsecs, 1_000_000);
convert!(Secs => Millisecs, 1_000);
