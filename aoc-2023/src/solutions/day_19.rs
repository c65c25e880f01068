
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use indexmap::IndexMap;
use nom::{
    branch::alt,
    character::complete::{alpha1, char, line_ending, multispace1, one_of},
    combinator::map,
    multi::separated_list1,
    sequence::{delimited, pair, separated_pair, tuple},
    IResult,
};

use crate::utils::parse::{run_parser, unsigned};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 19, tags = ["aplenty", "ranges", "dot"])]
pub struct Solver;

const CATEGORIES: &str = "xmas";
const START: &str = "in";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Accept,
    Reject,
    Workflow(&'a str),
}

impl<'a> Target<'a> {
    fn from_name(name: &'a str) -> Self {
        match name {
            "A" => Target::Accept,
            "R" => Target::Reject,
            other => Target::Workflow(other),
        }
    }

    fn name(&self) -> &'a str {
        match *self {
            Target::Accept => "A",
            Target::Reject => "R",
            Target::Workflow(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    /// Index into `xmas`
    pub category: usize,
    pub less_than: bool,
    pub value: u32,
}

impl Condition {
    fn holds(&self, part: &[u32; 4]) -> bool {
        let rating = part[self.category];
        if self.less_than {
            rating < self.value
        } else {
            rating > self.value
        }
    }

    /// Split an inclusive range into the part meeting the condition and the rest
    fn split(&self, (lo, hi): (u32, u32)) -> (Option<(u32, u32)>, Option<(u32, u32)>) {
        let (pass, fail) = if self.less_than {
            ((lo, hi.min(self.value.saturating_sub(1))), (lo.max(self.value), hi))
        } else {
            ((lo.max(self.value + 1), hi), (lo, hi.min(self.value)))
        };
        let non_empty = |(a, b): (u32, u32)| (a <= b).then_some((a, b));
        (non_empty(pass), non_empty(fail))
    }

    fn label(&self) -> String {
        let category = CATEGORIES.as_bytes()[self.category] as char;
        let op = if self.less_than { '<' } else { '>' };
        format!("{category}{op}{}", self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule<'a> {
    pub condition: Option<Condition>,
    pub target: Target<'a>,
}

pub type Workflows<'a> = IndexMap<&'a str, Vec<Rule<'a>>>;

#[derive(Debug)]
pub struct SharedData<'a> {
    pub workflows: Workflows<'a>,
    pub parts: Vec<[u32; 4]>,
}

fn category(input: &str) -> IResult<&str, usize> {
    map(one_of(CATEGORIES), |c| CATEGORIES.find(c).unwrap_or_default())(input)
}

fn rule(input: &str) -> IResult<&str, Rule<'_>> {
    alt((
        map(
            tuple((category, one_of("<>"), unsigned, char(':'), alpha1)),
            |(category, op, value, _, target)| Rule {
                condition: Some(Condition {
                    category,
                    less_than: op == '<',
                    value,
                }),
                target: Target::from_name(target),
            },
        ),
        map(alpha1, |target| Rule {
            condition: None,
            target: Target::from_name(target),
        }),
    ))(input)
}

fn workflow(input: &str) -> IResult<&str, (&str, Vec<Rule<'_>>)> {
    pair(
        alpha1,
        delimited(char('{'), separated_list1(char(','), rule), char('}')),
    )(input)
}

fn part(input: &str) -> IResult<&str, [u32; 4]> {
    let (rest, ratings) = delimited(
        char('{'),
        separated_list1(char(','), separated_pair(category, char('='), unsigned::<u32>)),
        char('}'),
    )(input)?;
    let mut part = [0; 4];
    for (category, rating) in ratings {
        part[category] = rating;
    }
    Ok((rest, part))
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let (workflows, parts) = run_parser(
            separated_pair(
                separated_list1(line_ending, workflow),
                multispace1,
                separated_list1(line_ending, part),
            ),
            input.trim_start(),
        )?;
        let workflows: Workflows<'a> = workflows.into_iter().collect();
        if !workflows.contains_key(START) {
            return Err(ParseError::MissingData(format!("no `{START}` workflow")));
        }
        Ok(SharedData { workflows, parts })
    }
}

fn lookup<'w, 'a>(workflows: &'w Workflows<'a>, name: &str) -> Result<&'w [Rule<'a>], SolveError> {
    workflows
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| SolveError::failed(format!("unknown workflow `{name}`")))
}

/// Whether `part` ends up accepted, starting from the `in` workflow
pub fn is_accepted(workflows: &Workflows<'_>, part: &[u32; 4]) -> Result<bool, SolveError> {
    let mut current: &str = START;
    // A part visiting more workflows than exist is going round in circles.
    for _ in 0..=workflows.len() {
        let rules = lookup(workflows, current)?;
        let target = rules
            .iter()
            .find(|r| r.condition.is_none_or(|c| c.holds(part)))
            .map(|r| r.target)
            .ok_or_else(|| SolveError::failed(format!("workflow `{current}` has no matching rule")))?;
        match target {
            Target::Accept => return Ok(true),
            Target::Reject => return Ok(false),
            Target::Workflow(next) => current = next,
        }
    }
    Err(SolveError::failed("workflows form a cycle"))
}

/// Number of rating combinations in `ranges` that `target` accepts
fn count_accepted(
    workflows: &Workflows<'_>,
    target: Target<'_>,
    mut ranges: [(u32, u32); 4],
    depth: usize,
) -> Result<u64, SolveError> {
    let name = match target {
        Target::Accept => {
            return Ok(ranges.iter().map(|&(lo, hi)| u64::from(hi - lo + 1)).product());
        }
        Target::Reject => return Ok(0),
        Target::Workflow(name) => name,
    };
    if depth > workflows.len() {
        return Err(SolveError::failed("workflows form a cycle"));
    }
    let mut total = 0;
    for rule in lookup(workflows, name)? {
        let Some(condition) = rule.condition else {
            return Ok(total + count_accepted(workflows, rule.target, ranges, depth + 1)?);
        };
        let (pass, fail) = condition.split(ranges[condition.category]);
        if let Some(pass) = pass {
            let mut sub = ranges;
            sub[condition.category] = pass;
            total += count_accepted(workflows, rule.target, sub, depth + 1)?;
        }
        match fail {
            Some(fail) => ranges[condition.category] = fail,
            None => return Ok(total),
        }
    }
    Ok(total)
}

/// Render the workflows as a DOT digraph; rules sharing a target become one labelled edge
pub fn workflows_to_dot(workflows: &Workflows<'_>) -> String {
    let mut dot = format!(
        "digraph workflows {{\n  \"{START}\" [shape=invhouse];\n  \"A\" [shape=doublecircle];\n  \"R\" [shape=box];\n"
    );
    for (name, rules) in workflows {
        let mut edges: IndexMap<&str, Vec<String>> = IndexMap::new();
        for rule in rules {
            let label = rule.condition.map_or_else(|| "else".to_string(), |c| c.label());
            edges.entry(rule.target.name()).or_default().push(label);
        }
        for (target, labels) in edges {
            dot.push_str(&format!(
                "  \"{name}\" -> \"{target}\" [label=\"{}\"];\n",
                labels.join(" | ")
            ));
        }
    }
    dot.push_str("}\n");
    dot
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut sum = 0u64;
        for part in &shared.parts {
            if is_accepted(&shared.workflows, part)? {
                sum += part.iter().map(|&r| u64::from(r)).sum::<u64>();
            }
        }
        Ok(sum.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let count = count_accepted(
            &shared.workflows,
            Target::Workflow(START),
            [(1, 4000); 4],
            0,
        )?;
        Ok(count.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;
    use crate::utils::dot;

    const EXAMPLE: &str = "px{a<2006:qkq,m>2090:A,rfg}
pv{a>1716:R,A}
lnx{m>1548:A,A}
rfg{s<537:gd,x>2440:R,A}
qs{s>3448:A,lnx}
qkq{x<1416:A,crn}
crn{x>2662:A,R}
in{s<1351:px,qqz}
qqz{s>2770:qs,m<1801:hdj,R}
gd{a>3333:R,R}
hdj{m>838:A,pv}

{x=787,m=2655,a=1222,s=2876}
{x=1679,m=44,a=2067,s=496}
{x=2036,m=264,a=79,s=2244}
{x=2461,m=1339,a=466,s=291}
{x=2127,m=1623,a=2188,s=1013}
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "19114");
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "167409079868000");
    }

    #[test]
    fn condition_split() {
        let lt = Condition {
            category: 0,
            less_than: true,
            value: 10,
        };
        assert_eq!(lt.split((1, 4000)), (Some((1, 9)), Some((10, 4000))));
        assert_eq!(lt.split((20, 30)), (None, Some((20, 30))));
        let gt = Condition {
            category: 0,
            less_than: false,
            value: 10,
        };
        assert_eq!(gt.split((1, 10)), (None, Some((1, 10))));
        assert_eq!(gt.split((5, 15)), (Some((11, 15)), Some((5, 10))));
    }

    #[test]
    fn dot_export_round_trips() {
        let shared = <Solver as AocParser>::parse(EXAMPLE).unwrap();
        let text = workflows_to_dot(&shared.workflows);
        let graph = dot::load(&text).unwrap();
        assert_eq!(graph.node_count(), 13);
        assert_eq!(graph.link_count(), 23);
        let label = |from: &str, to: &str| {
            graph
                .link(&from.to_string(), &to.to_string())
                .and_then(|l| l.data.get("label").cloned())
        };
        assert_eq!(label("in", "px").as_deref(), Some("s<1351"));
        assert_eq!(label("lnx", "A").as_deref(), Some("m>1548 | else"));
        assert_eq!(
            graph
                .node(&"A".to_string())
                .and_then(|n| n.data.get("shape").cloned())
                .as_deref(),
            Some("doublecircle")
        );
    }

    #[test]
    fn cycles_and_missing_workflows_fail() {
        let mut looping = <Solver as AocParser>::parse("in{a<5:in,A}\n\n{x=1,m=1,a=1,s=1}\n").unwrap();
        assert!(<Solver as PartSolver<1>>::solve(&mut looping).is_err());
        assert!(<Solver as PartSolver<2>>::solve(&mut looping).is_err());

        let mut dangling = <Solver as AocParser>::parse("in{zz}\n\n{x=1,m=1,a=1,s=1}\n").unwrap();
        assert!(<Solver as PartSolver<1>>::solve(&mut dangling).is_err());
    }

    #[test]
    fn missing_start_workflow() {
        assert!(matches!(
            <Solver as AocParser>::parse("px{A}\n\n{x=1,m=1,a=1,s=1}\n"),
            Err(ParseError::MissingData(_))
        ));
    }
}
