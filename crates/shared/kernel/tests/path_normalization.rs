use clic_kernel::path::split_path;
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,12}"
}

proptest! {
    #[test]
    fn surrounding_slashes_do_not_change_segments(
        segments in proptest::collection::vec(segment(), 0..6),
        leading in 0usize..3,
        trailing in 0usize..3,
    ) {
        let joined = segments.join("/");
        let decorated = format!("{}{}{}", "/".repeat(leading), joined, "/".repeat(trailing));

        prop_assert_eq!(split_path(&decorated).unwrap(), segments.clone());
        prop_assert_eq!(split_path(&joined).unwrap(), segments);
    }

    #[test]
    fn encoding_a_segment_is_transparent(word in "[a-zñáéíóú ]{1,10}") {
        let encoded = format!("/{}", urlencoding::encode(&word));
        prop_assert_eq!(split_path(&encoded).unwrap(), vec![word]);
    }
}

#[test]
fn accents_are_not_folded() {
    assert_eq!(split_path("/jardin").unwrap(), vec!["jardin"]);
    assert_eq!(split_path("/jard%C3%ADn").unwrap(), vec!["jardín"]);
    assert_ne!(split_path("/jardin").unwrap(), split_path("/jard%C3%ADn").unwrap());
}
