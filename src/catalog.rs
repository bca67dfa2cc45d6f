/// The fixed, ordered list of raw materials offered as selection candidates.
///
/// Order matters: selection dropdowns and exported reports list materials in
/// this order, so it is kept stable rather than sorted.
pub const MATERIALS: [&str; 61] = [
    "RSS III",
    "TSR10",
    "TSR 20",
    "No. 4 Ribbed smoked Sheet (RSS4-Ind)",
    "Special Grade (Dirt Free) RSS - IV",
    "Crumb Rubber",
    "HT Reclaim",
    "ESBR",
    "pbd-High Cis Br Nd",
    "PBD-High Cis Ni",
    "Bromobutyl Rubber HV",
    "SBR 4601",
    "SSBR 15% styrene, 30% vinyl, low Tg",
    "SBR 1502",
    "CD2109",
    "BC2207",
    "N134 SAF Carbon Black",
    "N220 ISAF Carbon Black",
    "N234",
    "N 330 Carbon Black",
    "N 339 Carbon Black",
    "N660 GPF Carbon Black",
    "HMMM (Hexa Methoxy methyl melamine) 72%",
    "Si363",
    "Active Silica Granular 175 sq.m/g",
    "TESPD-Bis(triethxysilylpropyl) disulfide",
    "Silane X 266S",
    "DC02",
    "Gum Rosin",
    "RAE Process Oil, Free of Labeling",
    "Hydrocarbon Homogenizing Resin",
    "Struktol HT 105",
    "Plasticiser Structol VP 1454 blend of fatty acid amide",
    "Dispersing Aid blend of Zn soaps of unsaturated high mol wt fatty acid & their esters",
    "Aliphatic Resin",
    "Phenol Formaldehyde Resin (25 kg bags)",
    "DCPD",
    "PF Resin TMOD 7.5% HMT",
    "RF Resin",
    "Koresin",
    "Vulcuran",
    "Peptizer",
    "Zinc Oxide - Indirect",
    "Stearic Acid",
    "Cobalt Borate Alkanoate",
    "Cobalt Stearate",
    "Resorcinol 66.7% / St. Acid 33.3% Melt",
    "Ozone Protecting Wax PE",
    "Antioxidant 6PPD",
    "Antioxidant TMQ",
    "Insoluble Sulphur Oil Treated 33%",
    "Insoluble Sulphur Oil Treated 20%",
    "Sulphur Soluble Fg No.1 0.5% Oil Based",
    "Accelerator - DPG",
    "Accelerator - DCBS",
    "Accelerator TBBS",
    "Accelerator CBS",
    "TBSI",
    "Accelerator TBzTD",
    "Accelerator - MBTS",
    "PVI - Retarder",
];

/// Preset slot counts offered on the material selection screen.
pub const SLOT_PRESETS: [usize; 3] = [3, 4, 5];

pub fn materials() -> &'static [&'static str] {
    &MATERIALS
}

/// Upper bound for the custom slot count: one slot per distinct material.
pub fn max_slots() -> usize {
    MATERIALS.len()
}

pub fn is_known(name: &str) -> bool {
    MATERIALS.contains(&name)
}

/// Candidates still available to the slot at `current_index`: the full
/// catalog minus materials already claimed by a different slot. The slot's
/// own current pick stays in the list so the dropdown can re-render it.
pub fn available_materials(
    selections: &[Option<String>],
    current_index: usize,
) -> Vec<&'static str> {
    MATERIALS
        .iter()
        .copied()
        .filter(|material| {
            !selections.iter().enumerate().any(|(index, selected)| {
                index != current_index && selected.as_deref() == Some(material)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_duplicate_free() {
        let mut seen = std::collections::HashSet::new();
        for material in materials() {
            assert!(seen.insert(material), "duplicate material: {material}");
        }
        assert_eq!(materials().len(), max_slots());
    }

    #[test]
    fn knows_its_own_entries() {
        assert!(is_known("RSS III"));
        assert!(is_known("PVI - Retarder"));
        assert!(!is_known("Unobtainium"));
    }

    #[test]
    fn availability_excludes_other_slots_picks() {
        let selections = vec![
            Some("RSS III".to_string()),
            Some("TSR10".to_string()),
            None,
        ];

        let for_last = available_materials(&selections, 2);
        assert!(!for_last.contains(&"RSS III"));
        assert!(!for_last.contains(&"TSR10"));
        assert_eq!(for_last.len(), materials().len() - 2);
    }

    #[test]
    fn availability_keeps_own_pick() {
        let selections = vec![Some("RSS III".to_string()), Some("TSR10".to_string())];

        let for_first = available_materials(&selections, 0);
        assert!(for_first.contains(&"RSS III"));
        assert!(!for_first.contains(&"TSR10"));
    }

    #[test]
    fn presets_fit_within_catalog() {
        for preset in SLOT_PRESETS {
            assert!(preset <= max_slots());
        }
    }
}
