//! Curated color presets
//!
//! Named palette matrices the store tiles over the grid via
//! `MeshGrid::apply_preset`. The matrices are small (3×3) and repeat over
//! larger grids by row/col modulo.

use rustc_hash::FxHashMap;
use weft_mesh::Color;

/// A named palette matrix
pub struct Preset {
    pub name: &'static str,
    pub colors: Vec<Vec<Color>>,
}

fn matrix(rows: [[u32; 3]; 3]) -> Vec<Vec<Color>> {
    rows.iter()
        .map(|row| row.iter().map(|&hex| Color::from_hex(hex)).collect())
        .collect()
}

/// The built-in preset list, in display order
pub fn make_presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "Aurora",
            colors: matrix([
                [0x0B3D4C, 0x14666B, 0x2AA187],
                [0x10242E, 0x3E8E7E, 0x8FE3B4],
                [0x071B26, 0x1C4D5E, 0x5BC4A0],
            ]),
        },
        Preset {
            name: "Sunset",
            colors: matrix([
                [0xFFB75E, 0xED8F03, 0xC94B4B],
                [0xFFD194, 0xF2709C, 0x904E95],
                [0xF7971E, 0xFF5858, 0x4B1248],
            ]),
        },
        Preset {
            name: "Ocean",
            colors: matrix([
                [0x021B79, 0x0575E6, 0x4BB8F0],
                [0x0B486B, 0x3B8D99, 0xA8E0DD],
                [0x001C30, 0x176B87, 0x64CCC5],
            ]),
        },
        Preset {
            name: "Candy",
            colors: matrix([
                [0xFF9A9E, 0xFAD0C4, 0xFBC2EB],
                [0xA18CD1, 0xFBC2EB, 0xFCB69F],
                [0xFF9A9E, 0xA1C4FD, 0xC2E9FB],
            ]),
        },
        Preset {
            name: "Forest",
            colors: matrix([
                [0x134E5E, 0x71B280, 0xA8C66C],
                [0x2C5364, 0x4E8C57, 0xD4E09B],
                [0x0F2027, 0x3B6E47, 0x86A873],
            ]),
        },
        Preset {
            name: "Mono",
            colors: matrix([
                [0x111111, 0x555555, 0x999999],
                [0x333333, 0x777777, 0xBBBBBB],
                [0x222222, 0x666666, 0xDDDDDD],
            ]),
        },
    ]
}

/// Preset list with a by-name index
pub struct PresetLibrary {
    presets: Vec<Preset>,
    by_name: FxHashMap<&'static str, usize>,
}

impl PresetLibrary {
    pub fn new() -> Self {
        let presets = make_presets();
        let by_name = presets
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name, i))
            .collect();
        Self { presets, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.by_name.get(name).map(|&i| &self.presets[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_indexes_all_presets() {
        let lib = PresetLibrary::new();
        assert_eq!(lib.len(), make_presets().len());
        for preset in lib.iter() {
            assert!(lib.get(preset.name).is_some());
        }
        assert!(lib.get("NoSuchPreset").is_none());
    }

    #[test]
    fn matrices_are_rectangular() {
        for preset in make_presets() {
            assert!(!preset.colors.is_empty());
            let cols = preset.colors[0].len();
            assert!(preset.colors.iter().all(|row| row.len() == cols));
        }
    }
}
