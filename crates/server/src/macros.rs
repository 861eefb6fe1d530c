#[macro_export]
macro_rules! field_method {
    ($field_name:ident, $type_name:ty) => {
        #[inline]
        #[must_use]
        pub fn $field_name(&self) -> &$type_name {
            &self.$field_name
        }
    };
}
