//! Opaque status codes
//!
//! Status columns are plain integers. The stores never interpret them, so an
//! unknown code read from the database is carried through unchanged; the named
//! constants only cover the codes the calling layer uses today.

/// Declare an `i32` status newtype with named codes
#[macro_export]
macro_rules! define_status {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$cmeta:meta])* $konst:ident = $value:expr ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            $( $(#[$cmeta])* pub const $konst: Self = Self($value); )*

            pub fn code(self) -> i32 {
                self.0
            }

            /// True when the code is one of the named constants
            pub fn is_known(self) -> bool {
                [$($value),*].contains(&self.0)
            }
        }

        impl From<i32> for $name {
            fn from(code: i32) -> Self {
                Self(code)
            }
        }

        impl From<$name> for i32 {
            fn from(status: $name) -> Self {
                status.0
            }
        }

        impl From<$name> for store_object::SqlValue {
            fn from(status: $name) -> Self {
                store_object::SqlValue::Int(i64::from(status.0))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
