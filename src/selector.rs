use super::*;

/// Attribute test inside `[...]`. Only the operators the page relies on are
/// supported: presence, `=` and `^=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
}

impl SelectorAttrCondition {
    pub(crate) fn matches(&self, attrs: &HashMap<String, String>) -> bool {
        match self {
            Self::Exists { key } => attrs.contains_key(key),
            Self::Eq { key, value } => attrs.get(key) == Some(value),
            // An empty prefix never matches, as in CSS.
            Self::StartsWith { key, value } => attrs
                .get(key)
                .is_some_and(|actual| !value.is_empty() && actual.starts_with(value.as_str())),
        }
    }
}

/// One compound selector such as `a.nav-link[href^="#"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
}

impl SelectorStep {
    /// `Some(id)` for a bare `#id`, which can be answered from the id index.
    pub(crate) fn id_only(&self) -> Option<&str> {
        let bare = !self.universal
            && self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty();
        self.id.as_deref().filter(|_| bare)
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    /// How this part relates to the part on its left; `None` for the first.
    pub(crate) combinator: Option<SelectorCombinator>,
}

/// Parses a selector list (`a, b > c`) into one chain per group.
pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    SelectorParser::new(selector).groups()
}

struct SelectorParser<'a> {
    src: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    fn unsupported(&self) -> Error {
        Error::UnsupportedSelector(self.src.to_string())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.bump() {
            Some(ch) if ch == expected => Ok(()),
            _ => Err(self.unsupported()),
        }
    }

    /// Skips whitespace and reports whether any was skipped.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|ch| ch.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek().filter(|ch| accept(*ch)) {
            out.push(ch);
            self.pos += 1;
        }
        out
    }

    fn ident(&mut self) -> Result<String> {
        let ident = self.take_while(is_ident_char);
        if ident.is_empty() {
            return Err(self.unsupported());
        }
        Ok(ident)
    }

    fn groups(mut self) -> Result<Vec<Vec<SelectorPart>>> {
        let mut groups = Vec::new();
        loop {
            groups.push(self.chain()?);
            match self.bump() {
                None => return Ok(groups),
                Some(',') => {}
                Some(_) => return Err(self.unsupported()),
            }
        }
    }

    /// Reads one complex selector, stopping before `,` or at the end.
    fn chain(&mut self) -> Result<Vec<SelectorPart>> {
        let mut parts: Vec<SelectorPart> = Vec::new();
        self.skip_ws();
        loop {
            let spaced = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    Some(SelectorCombinator::Child)
                }
                Some(_) if parts.is_empty() => None,
                Some(_) if spaced => Some(SelectorCombinator::Descendant),
                Some(_) => return Err(self.unsupported()),
            };
            if combinator.is_some() && parts.is_empty() {
                return Err(self.unsupported());
            }
            let step = self.compound()?;
            parts.push(SelectorPart { step, combinator });
        }
        if parts.is_empty() {
            return Err(self.unsupported());
        }
        Ok(parts)
    }

    fn compound(&mut self) -> Result<SelectorStep> {
        let mut step = SelectorStep::default();
        while let Some(ch) = self.peek() {
            match ch {
                '*' if step.is_empty() => {
                    self.pos += 1;
                    step.universal = true;
                }
                '#' => {
                    self.pos += 1;
                    let id = self.ident()?;
                    if step.id.replace(id).is_some() {
                        return Err(self.unsupported());
                    }
                }
                '.' => {
                    self.pos += 1;
                    let class_name = self.ident()?;
                    step.classes.push(class_name);
                }
                '[' => {
                    let condition = self.attr_condition()?;
                    step.attrs.push(condition);
                }
                ch if is_ident_char(ch) && step.is_empty() => {
                    step.tag = Some(self.ident()?.to_ascii_lowercase());
                }
                ch if ch.is_ascii_whitespace() || ch == ',' || ch == '>' => break,
                _ => return Err(self.unsupported()),
            }
        }
        if step.is_empty() {
            return Err(self.unsupported());
        }
        Ok(step)
    }

    fn attr_condition(&mut self) -> Result<SelectorAttrCondition> {
        self.expect('[')?;
        self.skip_ws();
        let key = self
            .take_while(|ch| is_ident_char(ch) || ch == ':')
            .to_ascii_lowercase();
        if key.is_empty() {
            return Err(self.unsupported());
        }
        self.skip_ws();

        let prefix = match self.bump() {
            Some(']') => return Ok(SelectorAttrCondition::Exists { key }),
            Some('=') => false,
            Some('^') => {
                self.expect('=')?;
                true
            }
            _ => return Err(self.unsupported()),
        };

        self.skip_ws();
        let value = self.attr_value()?;
        self.skip_ws();
        self.expect(']')?;

        Ok(if prefix {
            SelectorAttrCondition::StartsWith { key, value }
        } else {
            SelectorAttrCondition::Eq { key, value }
        })
    }

    fn attr_value(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let value = self.take_while(|ch| ch != quote);
                self.expect(quote)?;
                Ok(value)
            }
            Some(_) => {
                let value = self.take_while(|ch| !ch.is_ascii_whitespace() && ch != ']');
                if value.is_empty() {
                    return Err(self.unsupported());
                }
                Ok(value)
            }
            None => Err(self.unsupported()),
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}
