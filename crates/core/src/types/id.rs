//! Catalog identifiers.
//!
//! Products and books are numbered independently from 1 in their JSON
//! datasets, so each gets its own newtype and a product id can never be
//! used to look up a book.

macro_rules! catalog_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_u32(self) -> u32 {
                self.0
            }

            /// Zero is never assigned in a dataset.
            #[must_use]
            pub const fn is_valid(self) -> bool {
                self.0 != 0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

catalog_id!(
    /// A shop or merchandise product; also the cart line key.
    ProductId
);
catalog_id!(
    /// An entry in the library's book list.
    BookId
);
