use rectbin_core::config::{
    Algorithm, FreeRectChoiceHeuristic, GuillotineSplitHeuristic, LevelChoiceHeuristic,
    MaxRectsHeuristic,
};
use rectbin_core::geometry::{Rect, RectSize};
use rectbin_core::packer::{BinPacker, GuillotineBinPack, MaxRectsBinPack, SkylineBinPack};

#[test]
fn guillotine_oversized_item_leaves_state() {
    let mut bin = GuillotineBinPack::new(5, 5);
    bin.insert(
        2,
        2,
        true,
        FreeRectChoiceHeuristic::BestShortSideFit,
        GuillotineSplitHeuristic::MinimizeArea,
    )
    .expect("fits");
    let free = bin.free_rectangles().to_vec();
    let used = bin.used_rectangles().to_vec();
    assert!(
        bin.insert(
            6,
            6,
            true,
            FreeRectChoiceHeuristic::BestAreaFit,
            GuillotineSplitHeuristic::ShorterLeftoverAxis,
        )
        .is_none()
    );
    assert_eq!(bin.free_rectangles(), free.as_slice());
    assert_eq!(bin.used_rectangles(), used.as_slice());
}

#[test]
fn maxrects_oversized_item_leaves_state() {
    for h in [
        MaxRectsHeuristic::BestShortSideFit,
        MaxRectsHeuristic::BestLongSideFit,
        MaxRectsHeuristic::BestAreaFit,
        MaxRectsHeuristic::BottomLeft,
        MaxRectsHeuristic::ContactPoint,
    ] {
        let mut bin = MaxRectsBinPack::new(5, 5);
        assert!(bin.insert(6, 6, h).is_none());
        assert_eq!(bin.free_rectangles(), &[Rect::new(0, 0, 5, 5)]);
        assert!(bin.used_rectangles().is_empty());
        assert_eq!(bin.occupancy(), 0.0);
    }
}

#[test]
fn skyline_oversized_item_leaves_state() {
    for use_waste_map in [false, true] {
        for h in [LevelChoiceHeuristic::BottomLeft, LevelChoiceHeuristic::MinWasteFit] {
            let mut bin = SkylineBinPack::new(5, 5, use_waste_map);
            bin.insert(3, 1, h).expect("fits");
            let sky = bin.sky_line().to_vec();
            let area = bin.used_surface_area();
            assert!(bin.insert(6, 6, h).is_none());
            assert_eq!(bin.sky_line(), sky.as_slice());
            assert_eq!(bin.used_surface_area(), area);
        }
    }
}

#[test]
fn dispatcher_reports_failure_for_every_family() {
    for algorithm in [
        Algorithm::guillotine(),
        Algorithm::maxrects(MaxRectsHeuristic::ContactPoint),
        Algorithm::skyline(LevelChoiceHeuristic::MinWasteFit, true),
    ] {
        let mut packer = BinPacker::new(5, 5, algorithm);
        assert_eq!(packer.algorithm(), algorithm);
        assert_eq!((packer.width(), packer.height()), (5, 5));
        assert!(packer.insert(RectSize::new(6, 6)).is_none());
        assert_eq!(packer.occupancy(), 0.0);
        assert_eq!(packer.insert(RectSize::new(5, 5)), Some(Rect::new(0, 0, 5, 5)));
        assert!((packer.occupancy() - 1.0).abs() < 1e-9);
    }
}
