//! Fixed icon options for operator-chosen legends.
//!
//! In interactive mode the operator picks one of five named icons per node
//! subtype; the name is resolved to a hosted image through `ICON_TABLE`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IconOption {
    #[serde(rename = "White Hexagon")]
    WhiteHexagon,
    #[serde(rename = "Pink Hexagon")]
    PinkHexagon,
    #[serde(rename = "Blue Hexagon")]
    BlueHexagon,
    #[serde(rename = "Sky Blue Circle")]
    SkyBlueCircle,
    #[serde(rename = "Violet Hexagon")]
    VioletHexagon,
}

/// Icon name -> image URL. Exactly one entry per `IconOption`.
pub const ICON_TABLE: [(IconOption, &str); 5] = [
    (
        IconOption::WhiteHexagon,
        "https://association-map-cdn-public.s3.us-west-1.amazonaws.com/DragnetAlpha/AssociationMap/Stories2.png",
    ),
    (
        IconOption::PinkHexagon,
        "https://association-map-cdn-public.s3-us-west-1.amazonaws.com/DragnetAlpha/AssociationMap/Stories1.png",
    ),
    (
        IconOption::BlueHexagon,
        "https://association-map-cdn-public.s3.us-west-1.amazonaws.com/DragnetAlpha/AssociationMap/Target+Entity+1.png",
    ),
    (
        IconOption::SkyBlueCircle,
        "https://association-map-cdn-public.s3-us-west-1.amazonaws.com/DragnetAlpha/AssociationMap/Entity.png",
    ),
    (
        IconOption::VioletHexagon,
        "https://association-map-cdn-public.s3.us-west-1.amazonaws.com/DragnetAlpha/AssociationMap/Target+Entity+3.png",
    ),
];

impl IconOption {
    pub const ALL: [IconOption; 5] = [
        IconOption::WhiteHexagon,
        IconOption::PinkHexagon,
        IconOption::BlueHexagon,
        IconOption::SkyBlueCircle,
        IconOption::VioletHexagon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IconOption::WhiteHexagon => "White Hexagon",
            IconOption::PinkHexagon => "Pink Hexagon",
            IconOption::BlueHexagon => "Blue Hexagon",
            IconOption::SkyBlueCircle => "Sky Blue Circle",
            IconOption::VioletHexagon => "Violet Hexagon",
        }
    }

    pub fn url(self) -> &'static str {
        ICON_TABLE
            .iter()
            .find(|(option, _)| *option == self)
            .map(|(_, url)| *url)
            .unwrap_or_default()
    }
}

impl fmt::Display for IconOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IconOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        IconOption::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = IconOption::ALL.iter().map(|o| o.name()).collect();
                format!("unknown icon `{s}` (expected one of: {})", names.join(", "))
            })
    }
}

/// Operator selection: node subtype -> icon option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconChoices(pub IndexMap<String, IconOption>);

impl IconChoices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, subtype: impl Into<String>, icon: IconOption) -> Self {
        self.0.insert(subtype.into(), icon);
        self
    }

    pub fn get(&self, subtype: &str) -> Option<IconOption> {
        self.0.get(subtype).copied()
    }

    /// Two-level lookup: subtype -> chosen icon -> URL.
    pub fn url_for(&self, subtype: &str) -> Option<&'static str> {
        self.get(subtype).map(IconOption::url)
    }
}
