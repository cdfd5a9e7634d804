//! Tests for region selection and resolution

use crate::czi::errors::CziError;
use crate::czi::types::IntRect;
use crate::extractor::{resolve_region, RegionSelector, SceneBounds};

use super::test_utils::FakeSource;

#[test]
fn test_explicit_box_is_returned_verbatim() {
    let source = FakeSource::new().with_gray8(IntRect::new(0, 0, 4, 4), Some(0), 1);
    let rect = IntRect::new(100, 50, 128, 64);

    let resolved = resolve_region(&source, &RegionSelector::ExplicitBox(rect)).unwrap();

    assert_eq!(resolved, rect);
    assert_eq!(source.enumerations.get(), 0);
}

#[test]
fn test_explicit_box_may_lie_outside_the_image() {
    let source = FakeSource::new();
    let rect = IntRect::new(-10, -10, 5, 5);
    assert_eq!(resolve_region(&source, &RegionSelector::ExplicitBox(rect)).unwrap(), rect);
}

#[test]
fn test_scene_is_union_of_its_subblocks() {
    let source = FakeSource::new()
        .with_gray8(IntRect::new(0, 0, 10, 10), Some(1), 1)
        .with_gray8(IntRect::new(20, 5, 10, 10), Some(1), 1)
        .with_gray8(IntRect::new(500, 500, 10, 10), Some(2), 1);

    let rect = resolve_region(&source, &RegionSelector::SceneIndex(1)).unwrap();
    assert_eq!(rect, IntRect::new(0, 0, 30, 15));
}

#[test]
fn test_all_scenes_union() {
    let source = FakeSource::new()
        .with_gray8(IntRect::new(0, 0, 10, 10), Some(0), 1)
        .with_gray8(IntRect::new(5, 5, 10, 10), Some(1), 1);

    let rect = resolve_region(&source, &RegionSelector::SceneIndex(-1)).unwrap();
    assert_eq!(rect, IntRect::new(0, 0, 15, 15));

    // Any negative index selects everything
    let rect = resolve_region(&source, &RegionSelector::SceneIndex(-7)).unwrap();
    assert_eq!(rect, IntRect::new(0, 0, 15, 15));
}

#[test]
fn test_unknown_scene_gives_degenerate_rect() {
    let source = FakeSource::new().with_gray8(IntRect::new(0, 0, 10, 10), Some(0), 1);

    let rect = resolve_region(&source, &RegionSelector::SceneIndex(3)).unwrap();
    assert!(rect.w <= 0);
    assert!(rect.h <= 0);
    assert!(!rect.is_valid());
}

#[test]
fn test_subblock_without_scene_only_counts_for_all_scenes() {
    let source = FakeSource::new()
        .with_gray8(IntRect::new(0, 0, 10, 10), Some(0), 1)
        .with_gray8(IntRect::new(40, 40, 10, 10), None, 1);

    assert_eq!(resolve_region(&source, &RegionSelector::SceneIndex(0)).unwrap(),
               IntRect::new(0, 0, 10, 10));
    assert_eq!(resolve_region(&source, &RegionSelector::SceneIndex(-1)).unwrap(),
               IntRect::new(0, 0, 50, 50));
}

#[test]
fn test_empty_bounds() {
    let bounds = SceneBounds::new();
    assert_eq!(bounds.count(), 0);
    assert!(!bounds.to_rect().is_valid());
}

#[test]
fn test_selector_from_values() {
    assert_eq!(RegionSelector::from_values(&[2]).unwrap(), RegionSelector::SceneIndex(2));
    assert_eq!(RegionSelector::from_values(&[1, 2, 3, 4]).unwrap(),
               RegionSelector::ExplicitBox(IntRect::new(1, 2, 3, 4)));

    let bad: [&[i64]; 4] = [&[], &[1, 2], &[1, 2, 3], &[1, 2, 3, 4, 5]];
    for bad in bad {
        assert!(matches!(RegionSelector::from_values(bad), Err(CziError::Usage(_))));
    }
    assert!(matches!(RegionSelector::from_values(&[i64::MAX]), Err(CziError::Usage(_))));
}

#[test]
fn test_selector_parse() {
    assert_eq!(RegionSelector::parse("-1").unwrap(), RegionSelector::SceneIndex(-1));
    assert!(RegionSelector::parse("-1").unwrap().is_all_scenes());
    assert_eq!(RegionSelector::parse("0, 0, 512, 256").unwrap(),
               RegionSelector::ExplicitBox(IntRect::new(0, 0, 512, 256)));
    assert!(matches!(RegionSelector::parse("0,zero"), Err(CziError::Usage(_))));
}
