/// Define a sequential, `u64`-backed identifier type.
///
/// Encoded as a plain `u64`, so ids keep their numeric order when used as
/// table keys.
#[macro_export]
macro_rules! define_seq_id_type {
    (
        $(#[$outer:meta])*
        struct $t:tt
    ) => {
        $(#[$outer])*
        #[derive(Copy, Clone, Hash, Debug, PartialOrd, Ord, PartialEq, Eq)]
        #[cfg_attr(feature = "bincode", derive(::bincode::Encode, ::bincode::Decode))]
        #[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $t(u64);

        impl $t {
            pub const ZERO: Self = Self(0);
            pub const FIRST: Self = Self(1);
            pub const MAX: Self = Self(u64::MAX);

            pub const fn new(v: u64) -> Self {
                Self(v)
            }

            /// The id right after this one, `None` on overflow
            pub fn next(self) -> Option<Self> {
                self.0.checked_add(1).map(Self)
            }

            /// The id right before this one, `None` below zero
            pub fn prev(self) -> Option<Self> {
                self.0.checked_sub(1).map(Self)
            }
        }

        impl From<u64> for $t {
            fn from(v: u64) -> Self {
                Self(v)
            }
        }

        impl From<$t> for u64 {
            fn from(v: $t) -> Self {
                v.0
            }
        }

        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $t {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>().map(Self)
            }
        }
    };
}
