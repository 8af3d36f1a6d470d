//! Property tests for number formatting, table grids and polyline loops

mod common;

use common::*;
use dxf_graph::entities::{CellKind, EntityType, LwPolyline, Table};
use dxf_graph::io::dxf::format_real;
use dxf_graph::types::Vector2;
use dxf_graph::CadDocument;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_format_real_keeps_six_decimals(value in -1.0e9f64..1.0e9) {
        let text = format_real(value);
        prop_assert!(text.contains('.'));
        prop_assert!(!text.ends_with("00"));
        let parsed: f64 = text.parse().unwrap();
        prop_assert!((parsed - value).abs() <= 5.0e-7 * value.abs().max(1.0));
    }

    #[test]
    fn prop_format_real_integers_keep_one_decimal(value in -100_000i32..100_000) {
        prop_assert_eq!(format_real(f64::from(value)), format!("{}.0", value));
    }

    #[test]
    fn prop_initialize_cells_fills_grid(rows in 0usize..12, columns in 0usize..12) {
        let mut table = Table::new(Vector2::ZERO);
        let accepted = table.initialize_cells(rows, columns, CellKind::Text);
        prop_assert_eq!(accepted, rows > 0 && columns > 0);
        if accepted {
            prop_assert_eq!(table.cells.len(), rows * columns);
            prop_assert!(table.cell(rows - 1, columns - 1).is_some());
            prop_assert!(table.cell(rows, 0).is_none());
        } else {
            prop_assert!(table.cells.is_empty());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_table_grid_survives_roundtrip(rows in 1usize..5, columns in 1usize..5) {
        let mut table = Table::new(Vector2::new(5.0, 5.0));
        table.initialize_cells(rows, columns, CellKind::Text);
        table.set_row_height(6.0);
        table.set_column_width(20.0);
        let mut doc = CadDocument::new();
        doc.add_entity(table);

        let read = roundtrip(doc);
        let Some(EntityType::Table(table)) = first_of(&read, "ACAD_TABLE") else {
            panic!("table missing");
        };
        prop_assert_eq!((table.row_count, table.column_count), (rows, columns));
        prop_assert_eq!(table.cells.len(), rows * columns);
    }

    #[test]
    fn prop_polyline_vertices_survive_roundtrip(
        points in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 2..16),
        closed in any::<bool>(),
    ) {
        let vertices: Vec<Vector2> = points.iter().map(|(x, y)| Vector2::new(*x, *y)).collect();
        let mut doc = CadDocument::new();
        doc.add_entity(LwPolyline::from_points(vertices.clone(), closed));

        let read = roundtrip(doc);
        let Some(EntityType::LwPolyline(pline)) = first_of(&read, "LWPOLYLINE") else {
            panic!("polyline missing");
        };
        prop_assert_eq!(pline.is_closed, closed);
        prop_assert_eq!(pline.vertices.len(), vertices.len());
        for (got, want) in pline.vertices.iter().zip(&vertices) {
            prop_assert!((got.x - want.x).abs() < 1e-5 && (got.y - want.y).abs() < 1e-5);
        }
    }
}
