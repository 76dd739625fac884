//! Well-known host item ids.

use pantry_model::{DyeColor, Identifier};

/// `minecraft:shulker_box`
#[must_use]
pub fn shulker_box() -> Identifier {
    Identifier::from_static("minecraft", "shulker_box")
}

/// `minecraft:potion`
#[must_use]
pub fn potion() -> Identifier {
    Identifier::from_static("minecraft", "potion")
}

/// `minecraft:splash_potion`
#[must_use]
pub fn splash_potion() -> Identifier {
    Identifier::from_static("minecraft", "splash_potion")
}

/// `minecraft:lingering_potion`
#[must_use]
pub fn lingering_potion() -> Identifier {
    Identifier::from_static("minecraft", "lingering_potion")
}

/// `minecraft:crafting_table`
#[must_use]
pub fn crafting_table() -> Identifier {
    Identifier::from_static("minecraft", "crafting_table")
}

/// `minecraft:smithing_table`
#[must_use]
pub fn smithing_table() -> Identifier {
    Identifier::from_static("minecraft", "smithing_table")
}

/// `minecraft:brewing_stand`
#[must_use]
pub fn brewing_stand() -> Identifier {
    Identifier::from_static("minecraft", "brewing_stand")
}

/// `minecraft:<color>_dye`
#[must_use]
pub fn dye(color: DyeColor) -> Identifier {
    let path = match color {
        DyeColor::White => "white_dye",
        DyeColor::Orange => "orange_dye",
        DyeColor::Magenta => "magenta_dye",
        DyeColor::LightBlue => "light_blue_dye",
        DyeColor::Yellow => "yellow_dye",
        DyeColor::Lime => "lime_dye",
        DyeColor::Pink => "pink_dye",
        DyeColor::Gray => "gray_dye",
        DyeColor::LightGray => "light_gray_dye",
        DyeColor::Cyan => "cyan_dye",
        DyeColor::Purple => "purple_dye",
        DyeColor::Blue => "blue_dye",
        DyeColor::Brown => "brown_dye",
        DyeColor::Green => "green_dye",
        DyeColor::Red => "red_dye",
        DyeColor::Black => "black_dye",
    };
    Identifier::from_static("minecraft", path)
}
