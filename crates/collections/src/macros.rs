/// Builds a [`Record`](crate::Record), converting the string fields with `.into()`
#[macro_export]
macro_rules! record {
    ( $subject: expr, $key: expr, $tag: expr, $value: expr) => {
        $crate::Record {
            subject: $subject.into(),
            key: $key.into(),
            tag: $tag,
            value: $value,
        }
    };
}
