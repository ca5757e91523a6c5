use gtprep::gt::io_gt_txt::{from_gt_str, parse_gt_line, LineError};
use gtprep::gt::{BBoxXYXY, Coord, Quad, TextEncoding};
use proptest::prelude::*;

mod proptest_helpers;
use proptest_helpers::{arb_label, arb_quad, render_line};

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn label_survives_embedded_commas(coords in arb_quad(), label in arb_label()) {
        let raw = render_line(&coords, &label);
        let line = parse_gt_line(&raw, 0)
            .expect("nine or more fields")
            .expect("non-blank");

        prop_assert_eq!(line.text, label);
        let quad = line.quad.expect("numeric coordinates");
        for (point, pair) in quad.points.iter().zip(coords.chunks(2)) {
            prop_assert_eq!(point.x, pair[0].0);
            prop_assert_eq!(point.y, pair[1].0);
        }
    }

    #[test]
    fn short_lines_contribute_nothing(fields in prop::collection::vec("[0-9a-z ]{0,5}", 1..9)) {
        let raw = fields.join(",");
        match parse_gt_line(&raw, 0) {
            Ok(None) => prop_assert!(raw.trim().is_empty()),
            Ok(Some(line)) => prop_assert!(false, "unexpected line {:?}", line),
            Err(LineError::TooFewFields { found }) => prop_assert!(found < 9),
        }

        let file = from_gt_str(&format!("{raw}\n"), TextEncoding::Utf8);
        prop_assert!(file.lines.is_empty());
    }

    #[test]
    fn joined_text_matches_label_order(
        lines in prop::collection::vec((arb_quad(), arb_label()), 1..8)
    ) {
        let text: String = lines
            .iter()
            .map(|(coords, label)| format!("{}\n", render_line(coords, label)))
            .collect();
        let file = from_gt_str(&text, TextEncoding::Utf8);

        let expected: Vec<&str> = lines.iter().map(|(_, label)| label.as_str()).collect();
        prop_assert_eq!(file.joined_text(), expected.join(" "));
        prop_assert_eq!(file.lines.len(), lines.len());
    }

    #[test]
    fn clipped_boxes_stay_inside_the_image(
        xs in prop::array::uniform4(-500i64..1500),
        ys in prop::array::uniform4(-500i64..1500),
        width in 1u32..1000,
        height in 1u32..1000,
    ) {
        let quad = Quad {
            points: [
                Coord::new(xs[0], ys[0]),
                Coord::new(xs[1], ys[1]),
                Coord::new(xs[2], ys[2]),
                Coord::new(xs[3], ys[3]),
            ],
        };
        let bbox = quad.bbox();
        prop_assert_eq!(bbox.xmin(), *xs.iter().min().unwrap());
        prop_assert_eq!(bbox.ymax(), *ys.iter().max().unwrap());

        let clipped = bbox.clip(width, height);
        prop_assert!(clipped.xmin() >= 0 && clipped.xmax() <= i64::from(width));
        prop_assert!(clipped.ymin() >= 0 && clipped.ymax() <= i64::from(height));

        if let Some(rect) = bbox.crop_rect(width, height, 5) {
            prop_assert!(rect.width >= 5 && rect.height >= 5);
            prop_assert!(rect.x + rect.width <= width);
            prop_assert!(rect.y + rect.height <= height);
        }
    }

    #[test]
    fn small_boxes_never_yield_a_crop(
        x in 0i64..90,
        y in 0i64..90,
        w in 0i64..5,
        h in 0i64..90,
    ) {
        let bbox = BBoxXYXY::from_xyxy(x, y, x + w, y + h);
        prop_assert!(bbox.crop_rect(100, 100, 5).is_none());

        let transposed = BBoxXYXY::from_xyxy(y, x, y + h, x + w);
        prop_assert!(transposed.crop_rect(100, 100, 5).is_none());
    }
}
