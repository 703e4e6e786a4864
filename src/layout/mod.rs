//! Sheet partitioning.
//!
//! Large layouts group several cards per sheet, each card contributing its
//! native face followed by its English face. Small layouts give every face
//! its own sheet so it can be scrolled and snapped to independently.
//!
//! For `N` cards the sheet count is `ceil(N / cards_per_sheet)` on large
//! layouts and `2N` on small layouts, and no sheet is ever empty.

pub mod markup;

use serde::Serialize;

use crate::device::DeviceClass;

pub use markup::{escape_html, render_document, render_error_page, render_sheets};

/// Which side of a card a face shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Japanese name and origin elements.
    Native,
    /// English name and origin description.
    English,
}

/// One face of one card, by card index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaceRef {
    /// Index into the card list.
    pub card: usize,
    /// Side shown.
    pub side: Side,
}

/// A page-sized group of faces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    /// Position of the sheet in the deck.
    pub index: usize,
    /// Faces in display order.
    pub faces: Vec<FaceRef>,
}

/// Partitions `card_count` cards into sheets for `class`.
///
/// `cards_per_sheet` only applies to large layouts and must be non-zero
/// (enforced by configuration validation; zero is treated as one).
#[must_use]
pub fn partition(card_count: usize, class: DeviceClass, cards_per_sheet: usize) -> Vec<Sheet> {
    let faces_of = |card| {
        [
            FaceRef {
                card,
                side: Side::Native,
            },
            FaceRef {
                card,
                side: Side::English,
            },
        ]
    };

    match class {
        DeviceClass::Small => (0..card_count)
            .flat_map(faces_of)
            .enumerate()
            .map(|(index, face)| Sheet {
                index,
                faces: vec![face],
            })
            .collect(),
        DeviceClass::Large => {
            let per_sheet = cards_per_sheet.max(1);
            (0..card_count)
                .step_by(per_sheet)
                .enumerate()
                .map(|(index, start)| Sheet {
                    index,
                    faces: (start..card_count.min(start + per_sheet))
                        .flat_map(faces_of)
                        .collect(),
                })
                .collect()
        }
    }
}

/// Expected sheet count for a deck, without building the sheets.
#[must_use]
pub const fn sheet_count(card_count: usize, class: DeviceClass, cards_per_sheet: usize) -> usize {
    match class {
        DeviceClass::Small => card_count * 2,
        DeviceClass::Large => {
            let per_sheet = if cards_per_sheet == 0 { 1 } else { cards_per_sheet };
            card_count.div_ceil(per_sheet)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn five_cards_large_is_two_sheets() {
        let sheets = partition(5, DeviceClass::Large, 4);
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].faces.len(), 8);
        assert_eq!(sheets[1].faces.len(), 2);
        assert_eq!(sheets[1].faces[0], FaceRef { card: 4, side: Side::Native });
        assert_eq!(sheets[1].faces[1], FaceRef { card: 4, side: Side::English });
    }

    #[test]
    fn five_cards_small_is_ten_sheets() {
        let sheets = partition(5, DeviceClass::Small, 4);
        assert_eq!(sheets.len(), 10);
        assert_eq!(sheets[3].faces, vec![FaceRef { card: 1, side: Side::English }]);
        assert!(sheets.iter().enumerate().all(|(i, s)| s.index == i));
    }

    #[test]
    fn large_sheet_interleaves_faces_per_card() {
        let sheet = &partition(2, DeviceClass::Large, 4)[0];
        let sides: Vec<_> = sheet.faces.iter().map(|f| (f.card, f.side)).collect();
        assert_eq!(
            sides,
            vec![
                (0, Side::Native),
                (0, Side::English),
                (1, Side::Native),
                (1, Side::English),
            ]
        );
    }

    #[test]
    fn empty_deck_has_no_sheets() {
        assert!(partition(0, DeviceClass::Large, 4).is_empty());
        assert!(partition(0, DeviceClass::Small, 4).is_empty());
    }

    proptest! {
        #[test]
        fn sheet_counts_match_formula(n in 0usize..200, per in 1usize..9) {
            let large = partition(n, DeviceClass::Large, per);
            let small = partition(n, DeviceClass::Small, per);
            prop_assert_eq!(large.len(), n.div_ceil(per));
            prop_assert_eq!(small.len(), 2 * n);
            prop_assert_eq!(large.len(), sheet_count(n, DeviceClass::Large, per));
            prop_assert_eq!(small.len(), sheet_count(n, DeviceClass::Small, per));
        }

        #[test]
        fn no_sheet_is_empty(n in 0usize..100, per in 1usize..9) {
            for class in [DeviceClass::Large, DeviceClass::Small] {
                prop_assert!(partition(n, class, per).iter().all(|s| !s.faces.is_empty()));
            }
        }

        #[test]
        fn every_face_appears_once(n in 0usize..60) {
            for class in [DeviceClass::Large, DeviceClass::Small] {
                let faces: Vec<FaceRef> = partition(n, class, 4)
                    .into_iter()
                    .flat_map(|s| s.faces)
                    .collect();
                prop_assert_eq!(faces.len(), 2 * n);
                for (i, face) in faces.iter().enumerate() {
                    prop_assert_eq!(face.card, i / 2);
                }
            }
        }
    }
}
