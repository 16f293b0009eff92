//! Built-in starting grids.

use super::pattern::{row, Pattern};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub pattern: Pattern,
}

const BACKBEAT: &str = "....x.......x...";
const EIGHTHS: &str = "x.x.x.x.x.x.x.x.";

const TEMPLATES: [Template; 6] = [
    Template {
        id: "clear",
        name: "Clear",
        pattern: Pattern::EMPTY,
    },
    Template {
        id: "basic8beat",
        name: "Basic 8-beat",
        pattern: Pattern::from_rows(row(EIGHTHS), row(BACKBEAT), row("x.......x.......")),
    },
    Template {
        id: "rock8beat",
        name: "Rock 8-beat",
        pattern: Pattern::from_rows(row(EIGHTHS), row(BACKBEAT), row("x.....x.......x.")),
    },
    Template {
        id: "disco",
        name: "Disco",
        pattern: Pattern::from_rows(row(EIGHTHS), row(BACKBEAT), row("x...x...x...x...")),
    },
    Template {
        id: "shuffle",
        name: "Shuffle",
        pattern: Pattern::from_rows(
            row("x..x..x..x..x..x"),
            row(BACKBEAT),
            row("x.......x......."),
        ),
    },
    Template {
        id: "funk",
        name: "Funk",
        pattern: Pattern::from_rows(row(EIGHTHS), row("....x..x....x..."), row("x.........x.....")),
    },
];

impl Template {
    pub fn all() -> &'static [Template] {
        &TEMPLATES
    }

    pub fn by_id(id: &str) -> Option<&'static Template> {
        TEMPLATES.iter().find(|t| t.id == id)
    }

    /// The template after `id` in catalog order, wrapping. Unknown ids start
    /// at the first entry.
    pub fn next_after(id: Option<&str>) -> &'static Template {
        let next = id
            .and_then(|id| TEMPLATES.iter().position(|t| t.id == id))
            .map_or(0, |i| (i + 1) % TEMPLATES.len());
        &TEMPLATES[next]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voices::Voice;

    #[test]
    fn test_clear_is_empty() {
        assert!(Template::by_id("clear").unwrap().pattern.is_empty());
    }

    #[test]
    fn test_every_template_has_snare_on_the_backbeat() {
        for t in Template::all().iter().filter(|t| t.id != "clear") {
            assert!(t.pattern.is_active(Voice::Snare, 4), "{}", t.id);
            assert!(t.pattern.is_active(Voice::Snare, 12), "{}", t.id);
        }
    }

    #[test]
    fn test_rock_kick() {
        let rock = Template::by_id("rock8beat").unwrap();
        let kicks: Vec<_> = (0..16).filter(|&i| rock.pattern.is_active(Voice::Kick, i)).collect();
        assert_eq!(kicks, vec![0, 6, 14]);
    }

    #[test]
    fn test_next_after_wraps() {
        assert_eq!(Template::next_after(None).id, "clear");
        assert_eq!(Template::next_after(Some("clear")).id, "basic8beat");
        assert_eq!(Template::next_after(Some("funk")).id, "clear");
    }

    #[test]
    fn test_unknown_id() {
        assert!(Template::by_id("polka").is_none());
    }
}
