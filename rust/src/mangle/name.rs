use ahash::AHashSet;
use lazy_static::lazy_static;

use crate::lex::KEYWORDS;
use crate::source::SourceRange;

use super::scope::Identifier;

// Ordered by how often the letters appear in typical code, so output compresses well.
const NAME_START_CHARS: &'static [u8] = b"etnrisouaflchpdvmgybwESxTNCkLAOM_DPHBjFIqRUzWXV$JKQGYZ";
const NAME_CONTINUE_CHARS: &'static [u8] =
    b"etnrisouaflchpdvmgybwESxTNCkLAOM_DPHBjFIqRUzWXV$JKQGYZ0516372984";

lazy_static! {
    // Keywords, plus words that are reserved in strict mode or would change meaning if shadowed.
    static ref RESERVED_NAMES: AHashSet<&'static [u8]> = {
        let mut set: AHashSet<&'static [u8]> =
            KEYWORDS.iter().map(|(word, _)| word.as_bytes()).collect();
        for name in [
            "arguments", "enum", "eval", "implements", "Infinity", "interface", "NaN", "package",
            "private", "protected", "public", "undefined",
        ] {
            set.insert(name.as_bytes());
        }
        set
    };
}

// Yields names in order of length, then charset position, skipping reserved words and anything in
// `reserved`.
pub struct MinifiedNameGenerator<'a> {
    reserved: &'a AHashSet<Identifier>,
    // Charset indices of the last name, least significant first.
    state: Vec<usize>,
}

impl<'a> MinifiedNameGenerator<'a> {
    pub fn new(reserved: &'a AHashSet<Identifier>) -> MinifiedNameGenerator<'a> {
        MinifiedNameGenerator {
            reserved,
            state: Vec::new(),
        }
    }

    fn transition_to_next_possible_minified_name(&mut self) -> Vec<u8> {
        let n = &mut self.state;
        let mut overflow = true;
        for i in 0..n.len() {
            let charset = if i == n.len() - 1 {
                NAME_START_CHARS
            } else {
                NAME_CONTINUE_CHARS
            };
            if n[i] == charset.len() - 1 {
                n[i] = 0;
            } else {
                n[i] += 1;
                overflow = false;
                break;
            };
        }
        if overflow {
            n.push(0);
        };

        let mut name = Vec::with_capacity(n.len());
        for (i, idx) in n.iter().enumerate() {
            let charset = if i == n.len() - 1 {
                NAME_START_CHARS
            } else {
                NAME_CONTINUE_CHARS
            };
            name.push(charset[*idx]);
        }
        name.reverse();
        name
    }

    pub fn generate_next_available_minified_name(
        &mut self,
        avoid: &AHashSet<Identifier>,
    ) -> Identifier {
        loop {
            let name = self.transition_to_next_possible_minified_name();
            if RESERVED_NAMES.contains(name.as_slice()) {
                continue;
            };
            // Only ASCII bytes are ever generated.
            let as_ident = SourceRange::anonymous(String::from_utf8_lossy(&name).into_owned());
            if avoid.contains(&as_ident) || self.reserved.contains(&as_ident) {
                continue;
            };
            return as_ident;
        }
    }
}

#[cfg(test)]
mod tests {
    use ahash::AHashSet;

    use super::MinifiedNameGenerator;
    use crate::source::SourceRange;

    fn names(count: usize, avoid: &[&str], reserved: &[&str]) -> Vec<String> {
        let avoid: AHashSet<_> = avoid.iter().map(|n| SourceRange::anonymous(*n)).collect();
        let reserved: AHashSet<_> = reserved.iter().map(|n| SourceRange::anonymous(*n)).collect();
        let mut generator = MinifiedNameGenerator::new(&reserved);
        (0..count)
            .map(|_| generator.generate_next_available_minified_name(&avoid).as_str().to_string())
            .collect()
    }

    #[test]
    fn test_names_follow_frequency_order() {
        assert_eq!(names(5, &[], &[]), vec!["e", "t", "n", "r", "i"]);
    }

    #[test]
    fn test_names_skip_avoided_and_reserved() {
        assert_eq!(names(3, &["t"], &["n"]), vec!["e", "r", "i"]);
    }

    #[test]
    fn test_names_extend_after_single_characters() {
        let all = names(56, &[], &[]);
        assert_eq!(all[53], "Z");
        assert_eq!(all[54], "ee");
        assert_eq!(all[55], "et");
    }

    #[test]
    fn test_names_skip_keywords() {
        let all = names(54 * 65, &[], &[]);
        assert!(!all.iter().any(|n| n == "do" || n == "if" || n == "in"));
        assert!(all.iter().any(|n| n == "e0"));
    }
}
