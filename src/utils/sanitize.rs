use ammonia;

/// Clean user-supplied free text using the ammonia library.
///
/// Recipe titles, descriptions, ingredients and instructions are stored as
/// free text and echoed back to every browser that lists them, so markup is
/// stripped on the way in rather than trusting each client to escape it.
/// Newlines survive, which keeps the ingredient-per-line convention intact.
pub fn clean_text(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags() {
        let cleaned = clean_text("Tacos <script>alert(1)</script>");
        assert!(!cleaned.contains("<script>"));
        assert!(cleaned.contains("Tacos"));
    }

    #[test]
    fn keeps_newlines() {
        let cleaned = clean_text("2 tortillas\n1 onion\ncilantro");
        assert_eq!(cleaned.matches('\n').count(), 2);
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(clean_text("Pozole rojo"), "Pozole rojo");
    }
}
