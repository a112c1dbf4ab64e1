//! The `variant!` macro.

/// Declare a closed variant over a fixed list of alternative types.
///
/// ```ignore
/// helmsman::variant! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum State {
///         Off(Off),
///         Idle(Idle),
///         Turning(Turning),
///     }
/// }
/// ```
///
/// Expands to the enum itself plus:
/// - `Variant` for the enum (discriminant = declaration index)
/// - `Display` rendering `variant[<discriminant>]: <alternative>`
/// - `Alternative<Enum>`, `From<T> for Enum` and `Pattern<Enum>` for every
///   alternative type `T`
///
/// Alternative types must be distinct and implement `Display`. At most
/// [`MAX_ALTERNATIVES`](crate::variant::MAX_ALTERNATIVES) are allowed. An
/// empty alternative list declares an uninhabited variant.
///
/// The per-alternative impls expand one macro level per alternative, so a
/// variant with more than about 120 alternatives needs a larger
/// `#![recursion_limit]` in the declaring crate.
#[macro_export]
macro_rules! variant {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$alt_meta:meta])* $alt:ident ( $ty:ty ) ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$alt_meta])* $alt($ty), )*
        }

        impl $crate::variant::Variant for $name {
            const NAME: &'static str = ::std::stringify!($name);
            const ALTERNATIVES: &'static [&'static str] = &[$( ::std::stringify!($alt) ),*];

            fn discriminant(&self) -> $crate::variant::Discriminant {
                match *self {
                    $( $name::$alt(_) => <$ty as $crate::variant::Alternative<$name>>::DISCRIMINANT, )*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            #[allow(unused_variables)]
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match *self {
                    $(
                        $name::$alt(ref value) => ::std::write!(
                            f,
                            "variant[{}]: {}",
                            <$ty as $crate::variant::Alternative<$name>>::DISCRIMINANT,
                            value
                        ),
                    )*
                }
            }
        }

        const _: () = ::std::assert!(
            <$name as $crate::variant::Variant>::ALTERNATIVES.len()
                <= $crate::variant::MAX_ALTERNATIVES,
            "too many alternatives for a u8 discriminant"
        );

        $crate::__variant_alternatives!($name; 0; $( $alt($ty), )*);
    };
}

/// Per-alternative impls; the discriminant grows by one per alternative.
#[doc(hidden)]
#[macro_export]
macro_rules! __variant_alternatives {
    ($name:ident; $index:expr;) => {};
    ($name:ident; $index:expr; $alt:ident($ty:ty), $($rest:tt)*) => {
        impl $crate::variant::Alternative<$name> for $ty {
            const DISCRIMINANT: $crate::variant::Discriminant = $index;
            const NAME: &'static str = ::std::stringify!($alt);

            #[allow(unreachable_patterns)]
            fn project(variant: &$name) -> ::std::option::Option<&Self> {
                match variant {
                    $name::$alt(value) => ::std::option::Option::Some(value),
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unreachable_patterns)]
            fn project_mut(variant: &mut $name) -> ::std::option::Option<&mut Self> {
                match variant {
                    $name::$alt(value) => ::std::option::Option::Some(value),
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unreachable_patterns)]
            fn take(variant: $name) -> ::std::result::Result<Self, $name> {
                match variant {
                    $name::$alt(value) => ::std::result::Result::Ok(value),
                    other => ::std::result::Result::Err(other),
                }
            }
        }

        impl ::std::convert::From<$ty> for $name {
            fn from(value: $ty) -> Self {
                $crate::variant::trace_construct::<$name>($index);
                $name::$alt(value)
            }
        }

        impl $crate::dispatch::Pattern<$name> for $ty {
            type Target = $ty;

            fn accepts(discriminant: $crate::variant::Discriminant) -> bool {
                discriminant == <$ty as $crate::variant::Alternative<$name>>::DISCRIMINANT
            }

            fn bind(variant: &$name) -> ::std::option::Option<&$ty> {
                <$ty as $crate::variant::Alternative<$name>>::project(variant)
            }

            fn describe() -> ::std::string::String {
                ::std::string::String::from(::std::stringify!($alt))
            }
        }

        $crate::__variant_alternatives!($name; $index + 1; $($rest)*);
    };
}
