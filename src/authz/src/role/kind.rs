//! Closed set of role kind tags

use std::fmt::Debug;
use std::hash::Hash;

/// Tag identifying which role type a [`RoleValue`](super::RoleValue) belongs to
///
/// Implemented by a fieldless enum whose variants form the complete, closed set
/// of role kinds known to a [`Registry`](crate::registry::Registry). The
/// [`role_kinds!`](crate::role_kinds) macro generates a conforming enum.
///
/// # Contract
///
/// - `all()` lists every kind exactly once
/// - `index()` is the position of the kind inside `all()`
/// - `name()` is a stable, human-readable name used in errors and logs
pub trait RoleKind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every kind in the closed set, in declaration order
    fn all() -> &'static [Self];

    /// Dense position of this kind inside [`RoleKind::all`]
    fn index(&self) -> usize;

    /// Stable display name
    fn name(&self) -> &'static str;

    /// Number of kinds in the closed set
    fn count() -> usize {
        Self::all().len()
    }
}

/// Declare a closed set of role kinds
///
/// Generates a `Copy` enum deriving `Debug`, `Clone`, `Copy`, `PartialEq`,
/// `Eq`, `Hash`, `PartialOrd` and `Ord`, together with its [`RoleKind`]
/// implementation. Do not derive those traits again on the input.
///
/// # Example
///
/// ```rust
/// use rolecheck_authz::role::RoleKind;
///
/// rolecheck_authz::role_kinds! {
///     pub enum Team {
///         TeamMember,
///         TeamAdministrator,
///     }
/// }
///
/// assert_eq!(Team::count(), 2);
/// assert_eq!(Team::TeamAdministrator.index(), 1);
/// assert_eq!(Team::TeamMember.name(), "TeamMember");
/// ```
#[macro_export]
macro_rules! role_kinds {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::role::RoleKind for $name {
            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn index(&self) -> usize {
                *self as usize
            }

            fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }
    };
}
