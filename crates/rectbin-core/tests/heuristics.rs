use rectbin_core::config::{
    Algorithm, AtlasConfig, FreeRectChoiceHeuristic, GuillotineSplitHeuristic,
    LevelChoiceHeuristic, MaxRectsHeuristic, SortOrder,
};
use rectbin_core::geometry::{
    Rect, RectSize, common_interval_length, disjoint, fits, fits_perfectly, is_contained_in,
};
use rectbin_core::packer::guillotine::{
    score_best_area_fit, score_best_long_side_fit, score_best_short_side_fit, score_by_heuristic,
    split_along_axis, split_horizontal,
};
use rectbin_core::packer::maxrects::{
    score_best_area_fit_pair, score_best_long_side_fit_pair, score_best_short_side_fit_pair,
    score_bottom_left,
};
use serde_json::json;

#[test]
fn geometry_predicates() {
    let free = Rect::new(0, 0, 10, 4);
    assert!(fits(RectSize::new(4, 10), &free));
    assert!(!fits(RectSize::new(11, 1), &free));
    assert!(fits_perfectly(RectSize::new(4, 10), &free));
    assert!(!fits_perfectly(RectSize::new(4, 9), &free));

    assert!(is_contained_in(&Rect::new(2, 1, 8, 3), &free));
    assert!(is_contained_in(&free, &free));
    assert!(!is_contained_in(&Rect::new(2, 1, 9, 3), &free));

    // Touching edges do not overlap; degenerate rects overlap nothing.
    assert!(disjoint(&Rect::new(0, 0, 5, 5), &Rect::new(5, 0, 5, 5)));
    assert!(disjoint(&Rect::new(0, 0, 5, 5), &Rect::new(2, 2, 0, 3)));
    assert!(!disjoint(&Rect::new(0, 0, 5, 5), &Rect::new(4, 4, 5, 5)));
    assert!(Rect::new(0, 0, 5, 5).intersects(&Rect::new(4, 4, 5, 5)));
    assert!(free.contains(&Rect::new(9, 3, 1, 1)));

    assert_eq!(common_interval_length(0, 4, 2, 10), 2);
    assert_eq!(common_interval_length(0, 4, 4, 10), 0);
    assert_eq!(common_interval_length(5, 6, 0, 4), 0);
    assert_eq!(Rect::new(3, 4, 5, 6).right(), 8);
    assert_eq!(Rect::new(3, 4, 5, 6).bottom(), 10);
    assert_eq!(RectSize::new(3, 7).rotated(), RectSize::new(7, 3));
    assert_eq!(RectSize::new(3, 7).area(), 21);
    assert_eq!(Rect::new(1, 1, 3, 7).size(), RectSize::new(3, 7));
}

#[test]
fn guillotine_choice_scores() {
    let free = Rect::new(0, 0, 10, 10);
    assert_eq!(score_best_area_fit(3, 8, &free), 76);
    assert_eq!(score_best_short_side_fit(3, 8, &free), 2);
    assert_eq!(score_best_long_side_fit(3, 8, &free), 7);
    assert_eq!(
        score_by_heuristic(3, 8, &free, FreeRectChoiceHeuristic::WorstAreaFit),
        -76
    );
    assert_eq!(
        score_by_heuristic(3, 8, &free, FreeRectChoiceHeuristic::WorstShortSideFit),
        -2
    );
    assert_eq!(
        score_by_heuristic(3, 8, &free, FreeRectChoiceHeuristic::WorstLongSideFit),
        -7
    );

    let huge = Rect::new(0, 0, u32::MAX, u32::MAX);
    let max = u32::MAX as i128;
    assert_eq!(score_best_area_fit(1, 1, &huge), max * max - 1);
    assert_eq!(score_best_area_fit(u32::MAX, u32::MAX, &huge), 0);
    assert_eq!(
        score_by_heuristic(1, 1, &huge, FreeRectChoiceHeuristic::WorstAreaFit),
        1 - max * max
    );
}

#[test]
fn guillotine_split_decisions() {
    let free = Rect::new(0, 0, 10, 10);
    let placed = Rect::new(0, 0, 4, 8);
    // leftover w = 6, h = 2
    use GuillotineSplitHeuristic::*;
    assert!(!split_horizontal(&free, &placed, ShorterLeftoverAxis));
    assert!(split_horizontal(&free, &placed, LongerLeftoverAxis));
    assert!(!split_horizontal(&free, &placed, MinimizeArea));
    assert!(split_horizontal(&free, &placed, MaximizeArea));
    assert!(split_horizontal(&free, &placed, ShorterAxis));
    assert!(!split_horizontal(&free, &placed, LongerAxis));

    assert_eq!(
        split_along_axis(&free, &placed, true),
        (Some(Rect::new(0, 8, 10, 2)), Some(Rect::new(4, 0, 6, 8)))
    );
    assert_eq!(
        split_along_axis(&free, &placed, false),
        (Some(Rect::new(0, 8, 4, 2)), Some(Rect::new(4, 0, 6, 10)))
    );
    // Full-width placement leaves no right piece.
    assert_eq!(
        split_along_axis(&free, &Rect::new(0, 0, 10, 3), true),
        (Some(Rect::new(0, 3, 10, 7)), None)
    );
}

#[test]
fn maxrects_score_pairs() {
    let free = Rect::new(0, 0, 10, 10);
    assert_eq!(score_best_short_side_fit_pair(3, 8, &free), (2, 7));
    assert_eq!(score_best_long_side_fit_pair(3, 8, &free), (7, 2));
    assert_eq!(score_best_area_fit_pair(3, 8, &free), (76, 2));
    assert_eq!(score_bottom_left(&Rect::new(2, 5, 3, 8)), (13, 2));
}

#[test]
fn heuristics_parse_from_short_names() {
    assert_eq!("baf".parse::<FreeRectChoiceHeuristic>(), Ok(FreeRectChoiceHeuristic::BestAreaFit));
    assert_eq!("WSSF".parse::<FreeRectChoiceHeuristic>(), Ok(FreeRectChoiceHeuristic::WorstShortSideFit));
    assert_eq!("maxas".parse::<GuillotineSplitHeuristic>(), Ok(GuillotineSplitHeuristic::MaximizeArea));
    assert_eq!(
        "shorter_leftover_axis".parse::<GuillotineSplitHeuristic>(),
        Ok(GuillotineSplitHeuristic::ShorterLeftoverAxis)
    );
    assert_eq!("cp".parse::<MaxRectsHeuristic>(), Ok(MaxRectsHeuristic::ContactPoint));
    assert_eq!("bl".parse::<LevelChoiceHeuristic>(), Ok(LevelChoiceHeuristic::BottomLeft));
    assert_eq!("mw".parse::<LevelChoiceHeuristic>(), Ok(LevelChoiceHeuristic::MinWasteFit));
    assert_eq!("key_asc".parse::<SortOrder>(), Ok(SortOrder::KeyAsc));
    assert!("nope".parse::<MaxRectsHeuristic>().is_err());
}

#[test]
fn algorithm_parse_and_label() {
    assert_eq!(
        "maxrects:cp".parse::<Algorithm>(),
        Ok(Algorithm::maxrects(MaxRectsHeuristic::ContactPoint))
    );
    assert_eq!("maxrects".parse::<Algorithm>(), Ok(Algorithm::maxrects(MaxRectsHeuristic::BestAreaFit)));
    assert_eq!(
        "skyline:mw".parse::<Algorithm>(),
        Ok(Algorithm::skyline(LevelChoiceHeuristic::MinWasteFit, true))
    );
    assert_eq!(
        "guillotine:bssf:maxas".parse::<Algorithm>(),
        Ok(Algorithm::Guillotine {
            merge: true,
            choice: FreeRectChoiceHeuristic::BestShortSideFit,
            split: GuillotineSplitHeuristic::MaximizeArea,
        })
    );
    assert_eq!("guillotine".parse::<Algorithm>(), Ok(Algorithm::guillotine()));
    assert!("skyline:mw:extra".parse::<Algorithm>().is_err());
    assert!("shelf".parse::<Algorithm>().is_err());

    assert_eq!(Algorithm::maxrects(MaxRectsHeuristic::BestAreaFit).label(), "maxrects/BestAreaFit");
    assert_eq!(Algorithm::default().label(), "skyline/BottomLeft/waste_map");
}

#[test]
fn algorithm_serde_is_tagged_by_family() {
    let v = serde_json::to_value(Algorithm::maxrects(MaxRectsHeuristic::BottomLeft)).unwrap();
    assert_eq!(v, json!({ "family": "maxrects", "heuristic": "bottom_left" }));

    let a: Algorithm = serde_json::from_value(json!({ "family": "skyline" })).unwrap();
    assert_eq!(a, Algorithm::default());

    let g: Algorithm =
        serde_json::from_value(json!({ "family": "guillotine", "split": "longer_axis" })).unwrap();
    assert_eq!(
        g,
        Algorithm::Guillotine {
            merge: true,
            choice: FreeRectChoiceHeuristic::BestAreaFit,
            split: GuillotineSplitHeuristic::LongerAxis,
        }
    );
}

#[test]
fn atlas_config_defaults_and_validation() {
    let cfg: AtlasConfig = serde_json::from_value(json!({ "page_width": 256, "padding": 2 })).unwrap();
    assert_eq!(cfg.page_width, 256);
    assert_eq!(cfg.page_height, 1024);
    assert_eq!(cfg.padding, 2);
    assert_eq!(cfg.sort_order, SortOrder::AreaDesc);
    assert!(cfg.validate().is_ok());

    let built = AtlasConfig::builder()
        .with_page_size(64, 32)
        .padding(1)
        .max_pages(Some(2))
        .algorithm(Algorithm::guillotine())
        .sort_order(SortOrder::None)
        .time_budget_ms(Some(5))
        .parallel(true)
        .build();
    assert_eq!((built.page_width, built.page_height), (64, 32));
    assert_eq!(built.max_pages, Some(2));
    assert!(built.parallel);

    assert!(AtlasConfig::builder().with_page_size(0, 32).build().validate().is_err());
    assert!(AtlasConfig::builder().with_page_size(32, 32).padding(32).build().validate().is_err());
    assert!(AtlasConfig::builder().max_pages(Some(0)).build().validate().is_err());
}
