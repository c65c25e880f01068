use std::collections::VecDeque;

use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use indexmap::IndexMap;

use crate::utils::math::lcm_all;
use crate::utils::parse::lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 20, tags = ["pulse-propagation", "simulation", "lcm", "dot"])]
pub struct Solver;

const BROADCASTER: &str = "broadcaster";
const MAX_PRESSES: u64 = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Broadcaster,
    FlipFlop,
    Conjunction,
    /// Named as a destination but never defined
    Sink,
}

#[derive(Debug, Clone)]
pub struct Module<'a> {
    pub name: &'a str,
    pub kind: Kind,
    /// Destination module and this module's slot in its input memory
    outputs: Vec<(usize, usize)>,
    inputs: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Network<'a> {
    modules: Vec<Module<'a>>,
    index: IndexMap<&'a str, usize>,
    broadcaster: usize,
}

/// Flip-flop states and conjunction memories
#[derive(Debug, Clone)]
pub struct State {
    on: Vec<bool>,
    memory: Vec<Vec<bool>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub from: usize,
    pub to: usize,
    pub high: bool,
}

impl<'a> Network<'a> {
    fn parse(input: &'a str) -> anyhow::Result<Self> {
        let mut index: IndexMap<&'a str, usize> = IndexMap::new();
        let mut modules: Vec<Module<'a>> = Vec::new();
        let mut destinations: Vec<Vec<&'a str>> = Vec::new();

        let mut intern = |name: &'a str, modules: &mut Vec<Module<'a>>| -> usize {
            *index.entry(name).or_insert_with(|| {
                modules.push(Module {
                    name,
                    kind: Kind::Sink,
                    outputs: Vec::new(),
                    inputs: Vec::new(),
                });
                modules.len() - 1
            })
        };

        let mut defined = Vec::new();
        for (idx, line) in lines(input).enumerate() {
            let (source, targets) = line
                .split_once(" -> ")
                .ok_or_else(|| anyhow!("(line {}) expected `<module> -> <destinations>`", idx + 1))?;
            let (kind, name) = if let Some(name) = source.strip_prefix('%') {
                (Kind::FlipFlop, name)
            } else if let Some(name) = source.strip_prefix('&') {
                (Kind::Conjunction, name)
            } else if source == BROADCASTER {
                (Kind::Broadcaster, source)
            } else {
                bail!("(line {}) unknown module type `{source}`", idx + 1);
            };
            let id = intern(name, &mut modules);
            if defined.contains(&id) {
                bail!("(line {}) module `{name}` defined twice", idx + 1);
            }
            defined.push(id);
            modules[id].kind = kind;
            let targets: Vec<&'a str> = targets.split(',').map(str::trim).collect();
            for &target in &targets {
                intern(target, &mut modules);
            }
            destinations.resize(modules.len(), Vec::new());
            destinations[id] = targets;
        }
        destinations.resize(modules.len(), Vec::new());

        let broadcaster = *index
            .get(BROADCASTER)
            .ok_or_else(|| anyhow!("no `{BROADCASTER}` module"))?;
        for (from, targets) in destinations.into_iter().enumerate() {
            for target in targets {
                let to = index[target];
                let slot = modules[to].inputs.len();
                modules[to].inputs.push(from);
                modules[from].outputs.push((to, slot));
            }
        }
        Ok(Network {
            modules,
            index,
            broadcaster,
        })
    }

    pub fn id(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn initial_state(&self) -> State {
        State {
            on: vec![false; self.modules.len()],
            memory: self.modules.iter().map(|m| vec![false; m.inputs.len()]).collect(),
        }
    }

    /// Push the button once, calling `watch` for every pulse delivered
    pub fn press(&self, state: &mut State, mut watch: impl FnMut(Pulse)) {
        let mut queue = VecDeque::from([(
            Pulse {
                from: self.broadcaster,
                to: self.broadcaster,
                high: false,
            },
            0,
        )]);
        while let Some((pulse, slot)) = queue.pop_front() {
            watch(pulse);
            let module = &self.modules[pulse.to];
            let out = match module.kind {
                Kind::Broadcaster => pulse.high,
                Kind::FlipFlop if pulse.high => continue,
                Kind::FlipFlop => {
                    state.on[pulse.to] = !state.on[pulse.to];
                    state.on[pulse.to]
                }
                Kind::Conjunction => {
                    let memory = &mut state.memory[pulse.to];
                    memory[slot] = pulse.high;
                    !memory.iter().all(|&h| h)
                }
                Kind::Sink => continue,
            };
            queue.extend(module.outputs.iter().map(|&(to, slot)| {
                (
                    Pulse {
                        from: pulse.to,
                        to,
                        high: out,
                    },
                    slot,
                )
            }));
        }
    }

    /// Render as a DOT digraph, marking flip-flops and conjunctions by shape and label
    pub fn to_dot(&self) -> String {
        let nodes = self.modules.iter().map(|m| {
            let attrs = match m.kind {
                Kind::Broadcaster => "shape=box".to_string(),
                Kind::FlipFlop => format!("shape=circle, label=\"%{}\"", m.name),
                Kind::Conjunction => format!("shape=invtriangle, label=\"&{}\"", m.name),
                Kind::Sink => "shape=plaintext".to_string(),
            };
            format!("  \"{}\" [{attrs}];\n", m.name)
        });
        let links = self.modules.iter().flat_map(|m| {
            m.outputs
                .iter()
                .map(move |&(to, _)| format!("  \"{}\" -> \"{}\";\n", m.name, self.modules[to].name))
        });
        let body: String = nodes.chain(links).collect();
        format!("digraph modules {{\n{body}}}\n")
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Network<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        Network::parse(input).map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut state = shared.initial_state();
        let (mut low, mut high) = (0u64, 0u64);
        for _ in 0..1000 {
            shared.press(&mut state, |p| {
                if p.high {
                    high += 1;
                } else {
                    low += 1;
                }
            });
        }
        Ok((low * high).to_string())
    }
}

/// Presses until `rx` first gets a low pulse.
///
/// `rx` must be fed by a single conjunction; each of that conjunction's inputs
/// is assumed to send high on a fixed cycle starting from the first press.
pub fn presses_until_rx(network: &Network<'_>) -> Result<u64, SolveError> {
    let rx = network
        .id("rx")
        .ok_or_else(|| SolveError::failed("network has no `rx` module"))?;
    let feeder = match network.modules[rx].inputs.as_slice() {
        &[feeder] if network.modules[feeder].kind == Kind::Conjunction => feeder,
        _ => return Err(SolveError::failed("`rx` is not fed by a single conjunction")),
    };
    let watched = &network.modules[feeder].inputs;
    let mut first_high: Vec<Option<u64>> = vec![None; watched.len()];
    let mut state = network.initial_state();
    for press in 1..=MAX_PRESSES {
        network.press(&mut state, |p| {
            if p.high && p.to == feeder {
                if let Some(i) = watched.iter().position(|&w| w == p.from) {
                    first_high[i].get_or_insert(press);
                }
            }
        });
        if first_high.iter().all(Option::is_some) {
            return lcm_all(first_high.into_iter().flatten())
                .ok_or_else(|| SolveError::failed("conjunction feeding `rx` has no inputs"));
        }
    }
    Err(SolveError::failed("`rx` inputs never cycled"))
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(presses_until_rx(shared)?.to_string())
    }
}
