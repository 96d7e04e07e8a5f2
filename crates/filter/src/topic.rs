//! Abbildung Eingangs-Topic → Ausgangs-Topic

/// Zeichen, die am Ende eines konfigurierten Praefixes ignoriert werden
const PRAEFIX_ENDE: &[char] = &['/', '#'];

/// Schreibt `topic` vom Eingangs- auf den Ausgangs-Praefix um
///
/// Beide Praefixe werden von abschliessenden `/` und `#` befreit
/// (`msh/US/#` → `msh/US`). Beginnt `topic` mit dem Eingangs-Praefix, wird
/// dieser ersetzt; sonst bleibt `topic` unveraendert. Ein leerer
/// Eingangs-Praefix stellt den Ausgangs-Praefix voran.
pub fn topic_umschreiben(topic: &str, eingang: &str, ausgang: &str) -> String {
    let eingang = eingang.trim_end_matches(PRAEFIX_ENDE);
    let ausgang = ausgang.trim_end_matches(PRAEFIX_ENDE);

    if eingang.is_empty() {
        return if ausgang.is_empty() {
            topic.to_string()
        } else {
            format!("{ausgang}/{topic}")
        };
    }

    match topic.strip_prefix(eingang) {
        Some(rest) => format!("{ausgang}{rest}"),
        None => topic.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_praefix_wird_ersetzt() {
        assert_eq!(
            topic_umschreiben(
                "msh/US/NY/2/e/LongFast/!12345678",
                "msh/US/NY/#",
                "filtered/msh/US/NY"
            ),
            "filtered/msh/US/NY/2/e/LongFast/!12345678"
        );
    }

    #[test]
    fn abschliessender_slash_am_ausgang() {
        assert_eq!(
            topic_umschreiben("msh/EU/2/e/LongFast/!abcd", "msh/EU/#", "out/"),
            "out/2/e/LongFast/!abcd"
        );
    }

    #[test]
    fn fremdes_topic_bleibt_unveraendert() {
        assert_eq!(
            topic_umschreiben("other/topic", "msh/US/#", "filtered/msh/US"),
            "other/topic"
        );
    }

    #[test]
    fn leerer_eingangs_praefix() {
        assert_eq!(
            topic_umschreiben("msh/2/e/LongFast", "#", "filtered"),
            "filtered/msh/2/e/LongFast"
        );
        assert_eq!(topic_umschreiben("msh/x", "", ""), "msh/x");
    }

    #[test]
    fn exakter_praefix_ohne_rest() {
        assert_eq!(topic_umschreiben("msh/US", "msh/US/#", "out"), "out");
    }
}
