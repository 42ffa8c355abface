//! Reconciling differing separators into one
//!
//! A composite quantity like `6  pounds  4.50  ounces` is assembled from
//! several number/unit pairs, each with its own spacing. [`compromise`]
//! picks one separator that represents all of them. Every step is
//! deterministic so identical input always renders identically.

use std::collections::HashSet;

/// Seed for picking a whitespace character nobody agrees on
const WHITESPACE_PICK: f64 = 61.091056745;
/// Seed for picking a whole separator nobody agrees on
const OPTION_PICK: f64 = 54.7287857178;

/// Items sharing the highest count, and where they occurred
#[derive(Debug, Clone, PartialEq)]
struct Tally<T> {
    /// Most common items in first-seen order
    winners: Vec<T>,
    /// Indices holding a winner
    winning: Vec<usize>,
    /// Indices holding anything else
    others: Vec<usize>,
}

fn tied_for_most_common<T: PartialEq + Clone>(items: &[T]) -> Tally<T> {
    let mut distinct: Vec<(T, Vec<usize>)> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match distinct.iter_mut().find(|(seen, _)| seen == item) {
            Some((_, at)) => at.push(i),
            None => distinct.push((item.clone(), vec![i])),
        }
    }
    let best = distinct.iter().map(|(_, at)| at.len()).max().unwrap_or(0);

    let mut tally = Tally {
        winners: Vec::new(),
        winning: Vec::new(),
        others: Vec::new(),
    };
    for (item, at) in distinct {
        if at.len() == best {
            tally.winners.push(item);
            tally.winning.extend(at);
        } else {
            tally.others.extend(at);
        }
    }
    tally.winning.sort_unstable();
    tally.others.sort_unstable();
    tally
}

/// Deterministic stand-in for a random choice
fn pseudo_random_pick<T>(options: &[T], seed: f64) -> Option<&T> {
    let n = options.len();
    if n == 0 {
        return None;
    }
    let spread = n as f64;
    let index = ((spread + spread * (seed * spread).sin()) / 2.0).round() as usize;
    options.get(index.min(n - 1))
}

/// Collapse strings made of one repeated character, or only of whitespace.
///
/// With `bias_down` a uniform group whose average length rounds to zero
/// stays empty instead of being bumped to one character.
fn direct_average(strings: &[&str], bias_down: bool) -> Option<String> {
    let joined = strings.concat();
    let Some(first) = joined.chars().next() else {
        return Some(String::new());
    };
    let count = joined.chars().count();
    let mut len = count / strings.len().max(1);

    if joined.chars().all(|c| c == first) {
        if len == 0 && !bias_down {
            len = 1;
        }
        return Some(first.to_string().repeat(len));
    }

    if joined.chars().all(char::is_whitespace) {
        len = len.max(1);
        let chars: Vec<char> = joined.chars().collect();
        let options = tied_for_most_common(&chars).winners;
        let c = if options.contains(&' ') {
            ' '
        } else {
            *pseudo_random_pick(&options, WHITESPACE_PICK)?
        };
        return Some(c.to_string().repeat(len));
    }

    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Front,
    Back,
}

enum Peel {
    Agreed(char),
    Disagreement,
    Exhausted,
}

/// Remove one character every remaining string agrees on at `end`.
///
/// The character must be the unique plurality and held by more than half
/// of the strings. Strings holding a different character drop out.
fn peel(strings: &mut Vec<String>, end: End) -> Peel {
    let edges: Vec<(usize, char)> = strings
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            let c = match end {
                End::Front => s.chars().next(),
                End::Back => s.chars().next_back(),
            };
            c.map(|c| (i, c))
        })
        .collect();
    if edges.is_empty() {
        return Peel::Exhausted;
    }

    let chars: Vec<char> = edges.iter().map(|&(_, c)| c).collect();
    let tally = tied_for_most_common(&chars);
    if tally.winners.len() != 1 || tally.winning.len() * 2 <= strings.len() {
        return Peel::Disagreement;
    }

    for &k in &tally.winning {
        let s = &mut strings[edges[k].0];
        match end {
            End::Front => {
                s.remove(0);
            }
            End::Back => {
                s.pop();
            }
        }
    }
    let dissenting: HashSet<usize> = tally.others.iter().map(|&k| edges[k].0).collect();
    let mut index = 0;
    strings.retain(|_| {
        let keep = !dissenting.contains(&index);
        index += 1;
        keep
    });
    Peel::Agreed(tally.winners[0])
}

/// Choose one string representative of all `strings`
pub fn compromise<S: AsRef<str>>(strings: &[S]) -> String {
    let strings: Vec<&str> = strings.iter().map(AsRef::as_ref).collect();
    if let Some(average) = direct_average(&strings, false) {
        return average;
    }

    let best = tied_for_most_common(&strings).winners;
    if let [only] = best.as_slice() {
        return only.to_string();
    }
    if let Some(average) = direct_average(&best, false) {
        return average;
    }

    let mut rest: Vec<String> = best.iter().map(|s| s.to_string()).collect();
    let mut prefix = String::new();
    loop {
        match peel(&mut rest, End::Front) {
            Peel::Agreed(c) => prefix.push(c),
            Peel::Exhausted => return prefix,
            Peel::Disagreement => break,
        }
    }
    let mut suffix = String::new();
    loop {
        match peel(&mut rest, End::Back) {
            Peel::Agreed(c) => suffix.insert(0, c),
            Peel::Exhausted => return prefix + &suffix,
            Peel::Disagreement => break,
        }
    }

    let middle: Vec<&str> = rest.iter().map(String::as_str).collect();
    if let Some(average) = direct_average(&middle, prefix.ends_with(char::is_whitespace)) {
        return format!("{prefix}{average}{suffix}");
    }

    let mut options = tied_for_most_common(&middle).winners;
    if let [only] = options.as_slice() {
        return format!("{prefix}{only}{suffix}");
    }
    options.retain(|o| !o.is_empty());
    match pseudo_random_pick(&options, OPTION_PICK) {
        Some(pick) => format!("{prefix}{pick}{suffix}"),
        None => prefix + &suffix,
    }
}
