/// Build an [`Attrs`](crate::expr::Attrs) list from `name => value` pairs.
///
/// ```
/// let attrs = npugen::attrs! { "axis" => 1i64, "layout" => "NCHW" };
/// assert_eq!(attrs.get_str("layout"), Some("NCHW"));
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::expr::Attrs::none()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::expr::Attrs::none();
        $( attrs.set($name, $value); )+
        attrs
    }};
}

/// Call a primitive operator by [`OpKind`](crate::ops::OpKind) variant.
///
/// Attributes are optional and use the same syntax as [`attrs!`].
#[macro_export]
macro_rules! op {
    ($kind:ident ( $($arg:expr),* $(,)? ), { $($name:expr => $value:expr),* $(,)? }) => {
        $crate::expr::builder::call(
            $crate::ops::OpKind::$kind,
            vec![$($arg.clone()),*],
            $crate::attrs! { $($name => $value),* },
        )
    };
    ($kind:ident ( $($arg:expr),* $(,)? )) => {
        $crate::expr::builder::call(
            $crate::ops::OpKind::$kind,
            vec![$($arg.clone()),*],
            $crate::expr::Attrs::none(),
        )
    };
}
