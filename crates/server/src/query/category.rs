//! Job category classification.
//!
//! Position titles are free text; the category dimension is derived at read
//! time by ordered keyword matching and is never stored. The keyword table
//! is static configuration shared by every request.

/// Fallback bucket for positions no keyword set claims.
pub const UNCATEGORIZED: &str = "Sin categoria";

/// Ordered (label, keywords) table. The first label with a substring match
/// against the trimmed, upper-cased position wins, so management titles
/// like "GERENTE DE VENTAS" land in Gerencia rather than Ventas.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Gerencia",
        &["GERENTE", "GERENCIA", "DIRECTOR", "SUBDIRECTOR", "JEFE DE"],
    ),
    ("Ventas", &["VENTAS", "VENDEDOR", "MOSTRADOR", "CAJA"]),
    (
        "Taller",
        &["TECNICO", "TALLER", "MECANICO", "HOJALATERO", "PINTOR", "LAVADOR"],
    ),
    (
        "Administracion",
        &[
            "ADMINISTRA",
            "CONTAD",
            "AUXILIAR",
            "RECURSOS HUMANOS",
            "NOMINA",
            "SISTEMAS",
            "RECEPCION",
        ],
    ),
    ("Reparto", &["CHOFER", "REPARTO", "ALMACEN", "MENSAJERO"]),
];

/// Classify a position title into its category label.
///
/// Pure and deterministic: same input, same label, no shared mutable state.
pub fn classify(position: &str) -> &'static str {
    let needle = position.trim().to_uppercase();
    if needle.is_empty() {
        return UNCATEGORIZED;
    }
    for (label, keywords) in CATEGORIES {
        if keywords.iter().any(|keyword| needle.contains(keyword)) {
            return label;
        }
    }
    UNCATEGORIZED
}

/// Every label the classifier can produce, fallback bucket included.
pub fn labels() -> Vec<&'static str> {
    CATEGORIES
        .iter()
        .map(|(label, _)| *label)
        .chain(std::iter::once(UNCATEGORIZED))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn management_beats_sales_on_order() {
        // Contains keywords from two categories; the first entry wins.
        assert_eq!(classify("GERENTE DE VENTAS"), "Gerencia");
        assert_eq!(classify("VENDEDOR DE MOSTRADOR"), "Ventas");
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        assert_eq!(classify("  gerente de sucursal  "), "Gerencia");
        assert_eq!(classify("Tecnico de Taller"), "Taller");
    }

    #[test]
    fn unmatched_positions_fall_back() {
        assert_eq!(classify(""), UNCATEGORIZED);
        assert_eq!(classify("   "), UNCATEGORIZED);
        assert_eq!(classify("BECARIO"), UNCATEGORIZED);
    }

    #[test]
    fn classification_is_deterministic() {
        let first = classify("CHOFER DE REPARTO");
        for _ in 0..100 {
            assert_eq!(classify("CHOFER DE REPARTO"), first);
        }
        assert_eq!(first, "Reparto");
    }

    #[test]
    fn labels_include_every_category_and_fallback() {
        let labels = labels();
        assert_eq!(labels.len(), CATEGORIES.len() + 1);
        assert!(labels.contains(&"Gerencia"));
        assert!(labels.contains(&UNCATEGORIZED));
    }
}
