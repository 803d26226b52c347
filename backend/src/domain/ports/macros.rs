//! Helper macro for declaring port error enums.
//!
//! Each variant carries named fields and a display template. The macro derives
//! `thiserror::Error` and emits one snake_case constructor per variant whose
//! parameters accept anything convertible into the field type, so adapters can
//! write `ProfileRepositoryError::query("boom")`.

macro_rules! define_port_error {
    (@ctor $variant:ident ($($params:tt)*) ($($inits:tt)*)) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant () () $($field : $ty,)*);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Unreachable { message: String } => "unreachable: {message}",
            Exhausted { attempts: u32 } => "exhausted after {attempts} attempts",
            Rejected { message: String, status: u16 } => "rejected ({status}): {message}",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(
            SamplePortError::unreachable("db down").to_string(),
            "unreachable: db down"
        );
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let error = SamplePortError::exhausted(3_u32);
        assert_eq!(error, SamplePortError::Exhausted { attempts: 3 });
        assert_eq!(error.to_string(), "exhausted after 3 attempts");
    }

    #[test]
    fn mixed_fields_follow_declaration_order() {
        assert_eq!(
            SamplePortError::rejected("nope", 409_u16).to_string(),
            "rejected (409): nope"
        );
    }
}
