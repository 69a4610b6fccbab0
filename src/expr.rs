//! Expression tree and pattern rendering.
//!
//! An [`Expr`] is the output of state elimination and the input of the
//! renderer. Rendering an alternation is where every textual saving happens:
//! empty alternatives turn into a trailing `?`, single-character alternatives
//! fold into character classes, classes compress code-point runs into ranges,
//! and the full digit run collapses to `\d`.
//!
//! Alternation is commutative: reordering children never changes the matched
//! language. The renderer exploits that by sorting alternatives into a
//! canonical `(length, text)` order, which both shortens the output and makes
//! it independent of construction order.

/// A regex-dialect expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A literal run of characters; may be empty.
    Literal(String),
    /// Children matched in sequence. Must have at least one child.
    Concatenation(Vec<Expr>),
    /// Children matched as alternatives. Must have at least one child.
    Alternation(Vec<Expr>),
}

impl Expr {
    /// The empty literal.
    pub fn empty() -> Self {
        Expr::Literal(String::new())
    }

    pub fn literal(s: impl Into<String>) -> Self {
        Expr::Literal(s.into())
    }

    /// Flattens nested alternations and concatenations (associativity) and
    /// collapses single-child composites into their child. Idempotent:
    /// optimizing twice renders identically to optimizing once.
    ///
    /// # Panics
    ///
    /// Panics if a composite has no children; the synthesizer never builds
    /// one.
    pub fn optimize(self) -> Expr {
        match self {
            Expr::Literal(_) => self,
            Expr::Concatenation(children) => {
                assert!(!children.is_empty(), "concatenation with no children");
                if children.len() == 1 {
                    return children.into_iter().next().expect("one child").optimize();
                }
                let mut flat = Vec::with_capacity(children.len());
                for child in children {
                    match child.optimize() {
                        Expr::Concatenation(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                Expr::Concatenation(flat)
            }
            Expr::Alternation(children) => {
                assert!(!children.is_empty(), "alternation with no children");
                if children.len() == 1 {
                    return children.into_iter().next().expect("one child").optimize();
                }
                let mut flat = Vec::with_capacity(children.len());
                for child in children {
                    match child.optimize() {
                        Expr::Alternation(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                Expr::Alternation(flat)
            }
        }
    }

    /// Renders the expression to pattern text.
    ///
    /// # Panics
    ///
    /// Panics if a composite has no children.
    pub fn render(&self) -> String {
        match self {
            Expr::Literal(s) => s.clone(),
            Expr::Concatenation(children) => {
                assert!(!children.is_empty(), "concatenation with no children");
                children.iter().map(Expr::render).collect()
            }
            Expr::Alternation(children) => {
                assert!(!children.is_empty(), "alternation with no children");
                render_alternation(children)
            }
        }
    }

    /// Byte length of [`Expr::render`]; the synthesis cost heuristic's
    /// measure of an edge label.
    pub fn rendered_len(&self) -> usize {
        self.render().len()
    }
}

fn is_single_char(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some() && chars.next().is_none()
}

fn render_alternation(children: &[Expr]) -> String {
    if children.len() == 1 {
        return children[0].render();
    }

    let mut strings: Vec<String> = children.iter().map(Expr::render).collect();
    strings.sort_by(|a, b| {
        a.chars()
            .count()
            .cmp(&b.chars().count())
            .then_with(|| a.cmp(b))
    });
    strings.dedup();

    // An empty alternative makes the whole alternation optional.
    let optional = strings[0].is_empty();
    let rest = &strings[optional as usize..];
    let suffix = if optional { "?" } else { "" };
    if rest.is_empty() {
        return String::new();
    }

    // Everything is one character: a bare class beats `|` at any count.
    if rest.iter().all(|s| is_single_char(s)) {
        return format!("{}{}", char_class(rest), suffix);
    }

    // At least three single-character alternatives reach the break-even
    // point where `(?:[abc]|rest)` is no longer than `(?:a|b|c|rest)`; fold
    // exactly those into one class kept alongside the longer alternatives.
    let singles = rest.iter().take_while(|s| is_single_char(s)).count();
    let joined = if singles >= 3 {
        let mut alternatives = Vec::with_capacity(1 + rest.len() - singles);
        alternatives.push(char_class(&rest[..singles]));
        alternatives.extend(rest[singles..].iter().cloned());
        alternatives.join("|")
    } else {
        rest.join("|")
    };

    format!("(?:{joined}){suffix}")
}

/// Builds the shortest class text for a set of single-character alternatives.
///
/// Characters are sorted by code point; maximal runs of at least four
/// consecutive code points compress to `start-end`, and the full `0-9` run
/// becomes `\d`. A one-element result is returned bare (no brackets).
///
/// Two placement rules keep the emitted class inside the dialect: a
/// standalone `-` is moved to the end of the class, where it cannot read as a
/// range operator, and `^` is never left in first position, where it would
/// read as negation.
fn char_class(items: &[String]) -> String {
    if items.len() == 1 {
        return items[0].clone();
    }

    let mut chars: Vec<char> = items
        .iter()
        .map(|s| s.chars().next().expect("single-character alternative"))
        .collect();
    chars.sort_unstable();
    chars.dedup();
    if chars.len() == 1 {
        return chars[0].to_string();
    }

    let mut elements: Vec<String> = Vec::new();
    if chars.len() >= 4 {
        let mut i = 0;
        while i < chars.len() {
            let mut j = i;
            while j + 1 < chars.len() && chars[j + 1] as u32 == chars[j] as u32 + 1 {
                j += 1;
            }
            if j - i + 1 >= 4 {
                if chars[i] == '0' && chars[j] == '9' {
                    elements.push("\\d".to_owned());
                } else {
                    elements.push(format!("{}-{}", chars[i], chars[j]));
                }
            } else {
                for &c in &chars[i..=j] {
                    elements.push(c.to_string());
                }
            }
            i = j + 1;
        }
    } else {
        elements = chars.iter().map(|c| c.to_string()).collect();
    }

    if elements.len() == 1 && elements[0] == "\\d" {
        return "\\d".to_owned();
    }

    if let Some(pos) = elements.iter().position(|e| e == "-") {
        let dash = elements.remove(pos);
        elements.push(dash);
    }
    if elements.len() > 1 && elements[0] == "^" {
        elements.swap(0, 1);
    }

    format!("[{}]", elements.concat())
}

/// Distributes short literals over grouped alternations where that does not
/// lengthen the output, then re-flattens, until nothing changes.
///
/// The rewrite turns an alternation element `lit(?:a|b)` (or the mirrored
/// form) into the flat alternatives `lita|litb`, which frees them to merge
/// with their siblings (and often into a character class). A cheap length
/// formula pre-filters candidates; the rewrite is then kept only if the
/// surrounding alternation really renders no longer than before, with the
/// distributed form preferred at equal length.
pub fn distribute(mut expr: Expr) -> Expr {
    loop {
        expr = expr.optimize();
        let mut changed = false;
        expr = distribute_pass(expr, &mut changed);
        if !changed {
            return expr;
        }
    }
}

fn distribute_pass(expr: Expr, changed: &mut bool) -> Expr {
    match expr {
        Expr::Literal(_) => expr,
        Expr::Concatenation(children) => Expr::Concatenation(
            children
                .into_iter()
                .map(|c| distribute_pass(c, changed))
                .collect(),
        ),
        Expr::Alternation(children) => {
            let mut children: Vec<Expr> = children
                .into_iter()
                .map(|c| distribute_pass(c, changed))
                .collect();

            let mut i = 0;
            while i < children.len() {
                let Some(alternatives) = distribution_candidate(&children[i]) else {
                    i += 1;
                    continue;
                };

                let before = render_alternation(&children);
                let mut proposed = children.clone();
                let inserted = alternatives.len();
                proposed.splice(i..=i, alternatives);
                let after = render_alternation(&proposed);

                if after.len() <= before.len() {
                    children = proposed;
                    *changed = true;
                    i += inserted;
                } else {
                    i += 1;
                }
            }

            Expr::Alternation(children)
        }
    }
}

/// If `child` is `Concatenation[lit, alternation]` (either order) and the
/// length formula allows distributing, returns the distributed alternatives.
fn distribution_candidate(child: &Expr) -> Option<Vec<Expr>> {
    let Expr::Concatenation(parts) = child else {
        return None;
    };
    if parts.len() != 2 {
        return None;
    }

    let (lit, alts, lit_first) = match (&parts[0], &parts[1]) {
        (Expr::Literal(s), Expr::Alternation(alts)) => (s, alts, true),
        (Expr::Alternation(alts), Expr::Literal(s)) => (s, alts, false),
        _ => return None,
    };

    // `(?:a|b)lit` versus `alit|blit`: distribute when not longer.
    let len = lit.chars().count();
    let n = alts.len();
    if len * n + n - 1 > len + n - 1 + 4 {
        return None;
    }

    Some(
        alts.iter()
            .map(|a| {
                if lit_first {
                    Expr::Concatenation(vec![Expr::literal(lit.clone()), a.clone()])
                } else {
                    Expr::Concatenation(vec![a.clone(), Expr::literal(lit.clone())])
                }
            })
            .collect(),
    )
}
