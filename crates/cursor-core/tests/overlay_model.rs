//! Integration tests for the cursor-core overlay model.
//!
//! These tests drive the public API the way the agent's dispatcher does:
//! validate a coordinate, derive the next `OverlayState`, and render the
//! result as a wire DTO.

use cursor_core::{
    validate, BoundsError, CursorStateDto, DisplayBounds, ErrorKind, OverlayState, Point,
};

#[test]
fn test_every_point_outside_the_display_is_rejected_not_clamped() {
    let bounds = DisplayBounds::new(100.0, 200.0);
    let outside = [
        (-1.0, 0.0),
        (0.0, -1.0),
        (100.5, 10.0),
        (10.0, 200.5),
        (150.0, 50.0),
        (-50.0, 500.0),
        (1e9, 1e9),
    ];

    for (x, y) in outside {
        match validate(x, y, bounds) {
            Err(BoundsError::OutOfBounds {
                x: ex,
                y: ey,
                bounds: eb,
            }) => {
                // The error echoes exactly what was asked, never an adjusted value.
                assert_eq!((ex, ey), (x, y));
                assert_eq!(eb, bounds);
            }
            other => panic!("({x}, {y}) must be OutOfBounds, got {other:?}"),
        }
    }
}

#[test]
fn test_grid_inside_the_display_is_accepted_unchanged() {
    let bounds = DisplayBounds::new(393.0, 852.0);
    for xi in 0..=10 {
        for yi in 0..=10 {
            let x = bounds.width * xi as f64 / 10.0;
            let y = bounds.height * yi as f64 / 10.0;
            assert_eq!(validate(x, y, bounds), Ok(Point::new(x, y)));
        }
    }
}

#[test]
fn test_show_move_hide_sequence_produces_expected_wire_states() {
    // Arrange
    let bounds = DisplayBounds::new(100.0, 200.0);
    let fresh = OverlayState::default();

    // Act
    let shown = fresh.shown_at(Point::ORIGIN);
    let target = validate(50.0, 50.0, bounds).expect("inside bounds");
    let moved = shown.moved_to(target);
    let hidden = moved.hidden();

    // Assert
    assert_eq!(
        CursorStateDto::from(&shown),
        CursorStateDto {
            visible: true,
            x: Some(0.0),
            y: Some(0.0),
            revision: 1
        }
    );
    assert_eq!(CursorStateDto::from(&moved).x, Some(50.0));
    assert_eq!(CursorStateDto::from(&moved).revision, 2);
    assert_eq!(CursorStateDto::from(&hidden).x, None);
    assert_eq!(hidden.revision, 3);
}

#[test]
fn test_rotated_bounds_change_validation_outcome() {
    // A point valid in portrait can be invalid after rotating to landscape,
    // which is why bounds are fetched per validation and never cached.
    let portrait = DisplayBounds::new(393.0, 852.0);
    let landscape = DisplayBounds::new(852.0, 393.0);

    assert!(validate(100.0, 800.0, portrait).is_ok());
    assert!(validate(100.0, 800.0, landscape).is_err());
}

#[test]
fn test_error_kind_wire_names_are_stable() {
    let names: Vec<String> = [
        ErrorKind::OutOfBounds,
        ErrorKind::NotVisible,
        ErrorKind::InvalidArgument,
        ErrorKind::Timeout,
        ErrorKind::Faulted,
    ]
    .iter()
    .map(|k| serde_json::to_value(k).unwrap().as_str().unwrap().to_string())
    .collect();

    assert_eq!(
        names,
        ["OutOfBounds", "NotVisible", "InvalidArgument", "Timeout", "Faulted"]
    );
}
