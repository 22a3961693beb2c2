use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Heuristics for choosing a free rectangle in the Guillotine packer.
/// Every score is "smaller is better".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FreeRectChoiceHeuristic {
    BestAreaFit,
    BestShortSideFit,
    BestLongSideFit,
    WorstAreaFit,
    WorstShortSideFit,
    WorstLongSideFit,
}

impl FromStr for FreeRectChoiceHeuristic {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baf" | "bestareafit" | "best_area_fit" => Ok(Self::BestAreaFit),
            "bssf" | "bestshortsidefit" | "best_short_side_fit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" | "best_long_side_fit" => Ok(Self::BestLongSideFit),
            "waf" | "worstareafit" | "worst_area_fit" => Ok(Self::WorstAreaFit),
            "wssf" | "worstshortsidefit" | "worst_short_side_fit" => Ok(Self::WorstShortSideFit),
            "wlsf" | "worstlongsidefit" | "worst_long_side_fit" => Ok(Self::WorstLongSideFit),
            _ => Err(()),
        }
    }
}

/// Heuristics for the direction of the guillotine cut that splits the leftover L-shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GuillotineSplitHeuristic {
    ShorterLeftoverAxis,
    LongerLeftoverAxis,
    MinimizeArea,
    MaximizeArea,
    ShorterAxis,
    LongerAxis,
}

impl FromStr for GuillotineSplitHeuristic {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slas" | "shorterleftoveraxis" | "shorter_leftover_axis" => {
                Ok(Self::ShorterLeftoverAxis)
            }
            "llas" | "longerleftoveraxis" | "longer_leftover_axis" => Ok(Self::LongerLeftoverAxis),
            "minas" | "minimizearea" | "minimize_area" => Ok(Self::MinimizeArea),
            "maxas" | "maximizearea" | "maximize_area" => Ok(Self::MaximizeArea),
            "sas" | "shorteraxis" | "shorter_axis" => Ok(Self::ShorterAxis),
            "las" | "longeraxis" | "longer_axis" => Ok(Self::LongerAxis),
            _ => Err(()),
        }
    }
}

/// MaxRects placement heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MaxRectsHeuristic {
    BestShortSideFit,
    BestLongSideFit,
    BestAreaFit,
    /// Tetris placement: lowest top edge, then leftmost.
    BottomLeft,
    /// Maximize the perimeter touching placed rectangles and the bin edges.
    ContactPoint,
}

impl FromStr for MaxRectsHeuristic {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bssf" | "bestshortsidefit" | "best_short_side_fit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" | "best_long_side_fit" => Ok(Self::BestLongSideFit),
            "baf" | "bestareafit" | "best_area_fit" => Ok(Self::BestAreaFit),
            "bl" | "bottomleft" | "bottom_left" => Ok(Self::BottomLeft),
            "cp" | "contactpoint" | "contact_point" => Ok(Self::ContactPoint),
            _ => Err(()),
        }
    }
}

/// Skyline placement heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LevelChoiceHeuristic {
    BottomLeft,
    MinWasteFit,
}

impl FromStr for LevelChoiceHeuristic {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bl" | "bottomleft" | "bottom_left" => Ok(Self::BottomLeft),
            "mw" | "minwaste" | "minwastefit" | "min_waste_fit" => Ok(Self::MinWasteFit),
            _ => Err(()),
        }
    }
}

/// Packer family plus the heuristic choices it is driven with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum Algorithm {
    Guillotine {
        #[serde(default = "default_merge")]
        merge: bool,
        #[serde(default = "default_g_choice")]
        choice: FreeRectChoiceHeuristic,
        #[serde(default = "default_g_split")]
        split: GuillotineSplitHeuristic,
    },
    MaxRects {
        #[serde(default = "default_mr_heuristic")]
        heuristic: MaxRectsHeuristic,
    },
    Skyline {
        #[serde(default = "default_skyline_heuristic")]
        heuristic: LevelChoiceHeuristic,
        #[serde(default = "default_use_waste_map")]
        use_waste_map: bool,
    },
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Skyline {
            heuristic: default_skyline_heuristic(),
            use_waste_map: default_use_waste_map(),
        }
    }
}

impl Algorithm {
    pub fn guillotine() -> Self {
        Self::Guillotine {
            merge: default_merge(),
            choice: default_g_choice(),
            split: default_g_split(),
        }
    }

    pub fn maxrects(heuristic: MaxRectsHeuristic) -> Self {
        Self::MaxRects { heuristic }
    }

    pub fn skyline(heuristic: LevelChoiceHeuristic, use_waste_map: bool) -> Self {
        Self::Skyline {
            heuristic,
            use_waste_map,
        }
    }

    /// Short human-readable label, e.g. `maxrects/BestAreaFit`.
    pub fn label(&self) -> String {
        match self {
            Self::Guillotine {
                merge,
                choice,
                split,
            } => format!(
                "guillotine/{:?}/{:?}{}",
                choice,
                split,
                if *merge { "/merge" } else { "" }
            ),
            Self::MaxRects { heuristic } => format!("maxrects/{:?}", heuristic),
            Self::Skyline {
                heuristic,
                use_waste_map,
            } => format!(
                "skyline/{:?}{}",
                heuristic,
                if *use_waste_map { "/waste_map" } else { "" }
            ),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ();
    /// Parses a family name with an optional heuristic: `skyline`, `skyline:mw`,
    /// `maxrects:cp`, `guillotine:baf:slas`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let mut parts = lower.split(':');
        let family = parts.next().ok_or(())?;
        let first = parts.next();
        let second = parts.next();
        if parts.next().is_some() {
            return Err(());
        }
        match family {
            "skyline" => {
                if second.is_some() {
                    return Err(());
                }
                let heuristic = match first {
                    Some(h) => h.parse()?,
                    None => default_skyline_heuristic(),
                };
                Ok(Self::skyline(heuristic, default_use_waste_map()))
            }
            "maxrects" => {
                if second.is_some() {
                    return Err(());
                }
                let heuristic = match first {
                    Some(h) => h.parse()?,
                    None => default_mr_heuristic(),
                };
                Ok(Self::maxrects(heuristic))
            }
            "guillotine" => {
                let choice = match first {
                    Some(c) => c.parse()?,
                    None => default_g_choice(),
                };
                let split = match second {
                    Some(sp) => sp.parse()?,
                    None => default_g_split(),
                };
                Ok(Self::Guillotine {
                    merge: default_merge(),
                    choice,
                    split,
                })
            }
            _ => Err(()),
        }
    }
}

/// Sorting orders applied to layout inputs before packing. Sorting is stable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    AreaDesc,
    MaxSideDesc,
    HeightDesc,
    WidthDesc,
    KeyAsc,
    None,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "area_desc" => Ok(Self::AreaDesc),
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "height_desc" => Ok(Self::HeightDesc),
            "width_desc" => Ok(Self::WidthDesc),
            "key_asc" => Ok(Self::KeyAsc),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

/// Configuration of the multi-page atlas allocator and the layout API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AtlasConfig {
    /// Page width in pixels.
    pub page_width: u32,
    /// Page height in pixels.
    pub page_height: u32,
    /// Pixels reserved to the right of and below every allocation.
    pub padding: u32,
    /// Upper bound on the number of pages. `None` grows without limit.
    pub max_pages: Option<usize>,
    pub algorithm: Algorithm,
    pub sort_order: SortOrder,

    /// Optional time budget for the auto portfolio (milliseconds). None or 0 disables.
    pub time_budget_ms: Option<u64>,
    /// Evaluate portfolio candidates in parallel when feature "parallel" is on.
    pub parallel: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            page_width: 1024,
            page_height: 1024,
            padding: 0,
            max_pages: None,
            algorithm: Algorithm::default(),
            sort_order: SortOrder::AreaDesc,
            time_budget_ms: None,
            parallel: false,
        }
    }
}

impl AtlasConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if page dimensions are zero, if padding leaves no usable
    /// space, or if `max_pages` is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::BinPackError;

        if self.page_width == 0 || self.page_height == 0 {
            return Err(BinPackError::InvalidDimensions {
                width: self.page_width,
                height: self.page_height,
            });
        }
        if self.padding >= self.page_width || self.padding >= self.page_height {
            return Err(BinPackError::InvalidConfig(format!(
                "padding ({}) leaves no usable space in a {}x{} page",
                self.padding, self.page_width, self.page_height
            )));
        }
        if self.max_pages == Some(0) {
            return Err(BinPackError::InvalidConfig(
                "max_pages must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Create a fluent builder for `AtlasConfig`.
    pub fn builder() -> AtlasConfigBuilder {
        AtlasConfigBuilder::new()
    }
}

fn default_merge() -> bool {
    true
}
fn default_g_choice() -> FreeRectChoiceHeuristic {
    FreeRectChoiceHeuristic::BestAreaFit
}
fn default_g_split() -> GuillotineSplitHeuristic {
    GuillotineSplitHeuristic::ShorterLeftoverAxis
}
fn default_mr_heuristic() -> MaxRectsHeuristic {
    MaxRectsHeuristic::BestAreaFit
}
fn default_skyline_heuristic() -> LevelChoiceHeuristic {
    LevelChoiceHeuristic::BottomLeft
}
fn default_use_waste_map() -> bool {
    true
}

/// Builder for `AtlasConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct AtlasConfigBuilder {
    cfg: AtlasConfig,
}

impl AtlasConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: AtlasConfig::default(),
        }
    }
    pub fn with_page_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.page_width = w;
        self.cfg.page_height = h;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn max_pages(mut self, v: Option<usize>) -> Self {
        self.cfg.max_pages = v;
        self
    }
    pub fn algorithm(mut self, v: Algorithm) -> Self {
        self.cfg.algorithm = v;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn time_budget_ms(mut self, v: Option<u64>) -> Self {
        self.cfg.time_budget_ms = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> AtlasConfig {
        self.cfg
    }
}
