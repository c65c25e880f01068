//! Graphviz DOT reader
//!
//! [`parse`] turns DOT text into a syntax tree; [`load`] and [`load_into`]
//! build a [`Graph`] from it. Node and edge attributes become string maps;
//! graph-level attribute statements are parsed but not applied.

use super::graph::Graph;
use indexmap::IndexMap;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_until, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace1},
    combinator::{opt, recognize, value},
    multi::many0_count,
    sequence::{pair, tuple},
    IResult,
};
use thiserror::Error;

/// Attribute list of a node or link
pub type Attrs = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DotError {
    #[error("line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("no graph found")]
    NoGraph,
    #[error("expected a single graph, found {0}")]
    MultipleGraphs(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotGraph {
    pub strict: bool,
    pub directed: bool,
    pub id: Option<String>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Node(NodeStmt),
    Edge(EdgeStmt),
    Attr(AttrStmt),
    /// `id = id` at graph level
    Assign(String, String),
    Subgraph(Subgraph),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeId {
    pub id: String,
    /// `:port` and `:compass` suffixes, kept verbatim
    pub port: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStmt {
    pub node: NodeId,
    pub attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeEnd {
    Node(NodeId),
    Subgraph(Subgraph),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeStmt {
    /// At least two endpoints, connected pairwise in order
    pub ends: Vec<EdgeEnd>,
    pub attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrTarget {
    Graph,
    Node,
    Edge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrStmt {
    pub target: AttrTarget,
    pub attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgraph {
    pub id: Option<String>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Bare identifier or numeral; may be a keyword
    Word(String),
    /// Quoted or HTML string; never a keyword
    Text(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Colon,
    Equals,
    Plus,
    Arrow,
    Line,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("`{w}`"),
            Token::Text(t) => format!("\"{t}\""),
            Token::LBrace => "`{`".into(),
            Token::RBrace => "`}`".into(),
            Token::LBracket => "`[`".into(),
            Token::RBracket => "`]`".into(),
            Token::Semi => "`;`".into(),
            Token::Comma => "`,`".into(),
            Token::Colon => "`:`".into(),
            Token::Equals => "`=`".into(),
            Token::Plus => "`+`".into(),
            Token::Arrow => "`->`".into(),
            Token::Line => "`--`".into(),
        }
    }
}

#[derive(Debug)]
struct Spanned {
    token: Token,
    line: usize,
    column: usize,
}

fn skip(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0_count(alt((
            multispace1,
            recognize(pair(tag("//"), opt(is_not("\n")))),
            recognize(pair(char('#'), opt(is_not("\n")))),
            recognize(tuple((tag("/*"), take_until("*/"), tag("*/")))),
        ))),
    )(input)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || !c.is_ascii()
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_ident_start), take_while(is_ident_char)))(input)
}

fn numeral(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(char('-')),
        alt((
            recognize(pair(char('.'), digit1)),
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        )),
    ))(input)
}

fn punctuation(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Arrow, tag("->")),
        value(Token::Line, tag("--")),
        value(Token::LBrace, char('{')),
        value(Token::RBrace, char('}')),
        value(Token::LBracket, char('[')),
        value(Token::RBracket, char(']')),
        value(Token::Semi, char(';')),
        value(Token::Comma, char(',')),
        value(Token::Colon, char(':')),
        value(Token::Equals, char('=')),
        value(Token::Plus, char('+')),
    ))(input)
}

/// `"..."` with `\"` escapes and backslash-newline continuations
fn quoted(input: &str) -> Option<(&str, String)> {
    let body = input.strip_prefix('"')?;
    let mut out = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((&body[i + 1..], out)),
            '\\' => match chars.next() {
                Some((_, '"')) => out.push('"'),
                Some((_, '\n')) => {}
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return None,
            },
            _ => out.push(c),
        }
    }
    None
}

/// `<...>` with balanced angle brackets
fn html(input: &str) -> Option<(&str, String)> {
    let body = input.strip_prefix('<')?;
    let mut depth = 1usize;
    for (i, c) in body.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&body[i + 1..], body[..i].to_string()));
                }
            }
            _ => {}
        }
    }
    None
}

fn position(source: &str, rest: &str) -> (usize, usize) {
    let consumed = &source[..source.len() - rest.len()];
    let line = consumed.matches('\n').count() + 1;
    let column = consumed
        .rsplit('\n')
        .next()
        .map_or(0, |l| l.chars().count())
        + 1;
    (line, column)
}

fn tokenize(source: &str) -> Result<Vec<Spanned>, DotError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    loop {
        rest = skip(rest).map_or(rest, |(r, _)| r);
        if rest.is_empty() {
            return Ok(tokens);
        }
        let (line, column) = position(source, rest);
        let syntax = |message: &str| DotError::Syntax {
            line,
            column,
            message: message.to_string(),
        };

        let (next, token) = if rest.starts_with('"') {
            let (next, text) = quoted(rest).ok_or_else(|| syntax("unterminated string"))?;
            (next, Token::Text(text))
        } else if rest.starts_with('<') {
            let (next, text) = html(rest).ok_or_else(|| syntax("unterminated HTML string"))?;
            (next, Token::Text(text))
        } else if let Ok((next, token)) = punctuation(rest) {
            (next, token)
        } else if let Ok((next, word)) = alt((numeral, identifier))(rest) {
            (next, Token::Word(word.to_string()))
        } else {
            return Err(syntax("unexpected character"));
        };

        tokens.push(Spanned {
            token,
            line,
            column,
        });
        rest = next;
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    directed: bool,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|s| &s.token)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|s| s.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> DotError {
        let (line, column) = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or((1, 1), |s| (s.line, s.column));
        DotError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    fn unexpected(&self, expected: &str) -> DotError {
        match self.peek() {
            Some(token) => self.error(format!("expected {expected}, found {}", token.describe())),
            None => self.error(format!("expected {expected}, found end of input")),
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), DotError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(&token.describe()))
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword))
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let found = self.at_keyword(keyword);
        if found {
            self.pos += 1;
        }
        found
    }

    fn at_id(&self) -> bool {
        matches!(self.peek(), Some(Token::Word(_) | Token::Text(_)))
    }

    /// An id; quoted strings may be joined with `+`
    fn id(&mut self) -> Result<String, DotError> {
        if !self.at_id() {
            return Err(self.unexpected("an identifier"));
        }
        match self.bump() {
            Some(Token::Word(w)) => Ok(w),
            Some(Token::Text(mut text)) => {
                while self.peek() == Some(&Token::Plus) {
                    self.pos += 1;
                    match self.bump() {
                        Some(Token::Text(more)) => text.push_str(&more),
                        _ => {
                            self.pos -= 1;
                            return Err(self.unexpected("a quoted string after `+`"));
                        }
                    }
                }
                Ok(text)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn graph(&mut self) -> Result<DotGraph, DotError> {
        let strict = self.eat_keyword("strict");
        self.directed = if self.eat_keyword("digraph") {
            true
        } else if self.eat_keyword("graph") {
            false
        } else {
            return Err(self.unexpected("`graph` or `digraph`"));
        };
        let id = if self.at_id() { Some(self.id()?) } else { None };
        self.expect(&Token::LBrace)?;
        let stmts = self.stmt_list()?;
        self.expect(&Token::RBrace)?;
        Ok(DotGraph {
            strict,
            directed: self.directed,
            id,
            stmts,
        })
    }

    fn stmt_list(&mut self) -> Result<Vec<Stmt>, DotError> {
        let mut stmts = Vec::new();
        while !matches!(self.peek(), Some(Token::RBrace) | None) {
            stmts.push(self.stmt()?);
            self.eat(&Token::Semi);
        }
        Ok(stmts)
    }

    fn stmt(&mut self) -> Result<Stmt, DotError> {
        for (keyword, target) in [
            ("graph", AttrTarget::Graph),
            ("node", AttrTarget::Node),
            ("edge", AttrTarget::Edge),
        ] {
            if self.at_keyword(keyword) {
                self.pos += 1;
                if self.peek() != Some(&Token::LBracket) {
                    return Err(self.unexpected("`[`"));
                }
                let attrs = self.attr_lists()?;
                return Ok(Stmt::Attr(AttrStmt { target, attrs }));
            }
        }

        if self.at_keyword("subgraph") || self.peek() == Some(&Token::LBrace) {
            let subgraph = self.subgraph()?;
            return if self.at_edge_op() {
                self.edge_stmt(EdgeEnd::Subgraph(subgraph))
            } else {
                Ok(Stmt::Subgraph(subgraph))
            };
        }

        if self.at_id() && self.peek_at(1) == Some(&Token::Equals) {
            let name = self.id()?;
            self.expect(&Token::Equals)?;
            let value = self.id()?;
            return Ok(Stmt::Assign(name, value));
        }

        let node = self.node_id()?;
        if self.at_edge_op() {
            return self.edge_stmt(EdgeEnd::Node(node));
        }
        let attrs = self.attr_lists()?;
        Ok(Stmt::Node(NodeStmt { node, attrs }))
    }

    fn at_edge_op(&self) -> bool {
        matches!(self.peek(), Some(Token::Arrow | Token::Line))
    }

    fn edge_stmt(&mut self, first: EdgeEnd) -> Result<Stmt, DotError> {
        let mut ends = vec![first];
        while self.at_edge_op() {
            let op = self.bump();
            let arrow = op == Some(Token::Arrow);
            if arrow != self.directed {
                self.pos -= 1;
                return Err(self.error(if self.directed {
                    "`--` used in a digraph"
                } else {
                    "`->` used in an undirected graph"
                }));
            }
            let end = if self.at_keyword("subgraph") || self.peek() == Some(&Token::LBrace) {
                EdgeEnd::Subgraph(self.subgraph()?)
            } else {
                EdgeEnd::Node(self.node_id()?)
            };
            ends.push(end);
        }
        let attrs = self.attr_lists()?;
        Ok(Stmt::Edge(EdgeStmt { ends, attrs }))
    }

    fn subgraph(&mut self) -> Result<Subgraph, DotError> {
        let id = if self.eat_keyword("subgraph") && self.at_id() {
            Some(self.id()?)
        } else {
            None
        };
        self.expect(&Token::LBrace)?;
        let stmts = self.stmt_list()?;
        self.expect(&Token::RBrace)?;
        Ok(Subgraph { id, stmts })
    }

    fn node_id(&mut self) -> Result<NodeId, DotError> {
        let id = self.id()?;
        let mut port: Option<String> = None;
        while self.eat(&Token::Colon) {
            let part = self.id()?;
            port = Some(match port {
                Some(p) => format!("{p}:{part}"),
                None => part,
            });
        }
        Ok(NodeId { id, port })
    }

    /// Zero or more `[a=b, c=d; ...]` groups
    fn attr_lists(&mut self) -> Result<Vec<(String, String)>, DotError> {
        let mut attrs = Vec::new();
        while self.eat(&Token::LBracket) {
            while !self.eat(&Token::RBracket) {
                let name = self.id()?;
                self.expect(&Token::Equals)?;
                let value = self.id()?;
                attrs.push((name, value));
                if !self.eat(&Token::Comma) {
                    self.eat(&Token::Semi);
                }
            }
        }
        Ok(attrs)
    }
}

/// Parse every graph in `text`
pub fn parse(text: &str) -> Result<Vec<DotGraph>, DotError> {
    let mut parser = Parser {
        tokens: tokenize(text)?,
        pos: 0,
        directed: false,
    };
    let mut graphs = Vec::new();
    while parser.peek().is_some() {
        graphs.push(parser.graph()?);
    }
    Ok(graphs)
}

/// Build a new graph from DOT text holding exactly one graph
pub fn load(text: &str) -> Result<Graph<Attrs, Attrs, String>, DotError> {
    let mut graph = Graph::new();
    load_into(text, &mut graph)?;
    Ok(graph)
}

/// Add the nodes and links of a single DOT graph to `graph`.
///
/// Links follow the written order of each edge, also in undirected graphs.
/// Repeated nodes and links merge their attributes.
pub fn load_into(text: &str, graph: &mut Graph<Attrs, Attrs, String>) -> Result<(), DotError> {
    let graphs = parse(text)?;
    let dot = match graphs.as_slice() {
        [] => return Err(DotError::NoGraph),
        [single] => single,
        many => return Err(DotError::MultipleGraphs(many.len())),
    };
    graph.begin_update();
    apply(&dot.stmts, graph);
    graph.end_update();
    Ok(())
}

/// Apply statements, returning every node id they mention in order
fn apply(stmts: &[Stmt], graph: &mut Graph<Attrs, Attrs, String>) -> Vec<String> {
    fn mention(mentioned: &mut Vec<String>, id: &str) {
        if !mentioned.iter().any(|m| m == id) {
            mentioned.push(id.to_string());
        }
    }

    let mut mentioned: Vec<String> = Vec::new();

    for stmt in stmts {
        match stmt {
            Stmt::Node(NodeStmt { node, attrs }) => {
                let mut data = graph
                    .node(&node.id)
                    .map(|n| n.data.clone())
                    .unwrap_or_default();
                data.extend(attrs.iter().cloned());
                graph.add_node(node.id.clone(), data);
                mention(&mut mentioned, &node.id);
            }
            Stmt::Edge(EdgeStmt { ends, attrs }) => {
                let groups: Vec<Vec<String>> = ends
                    .iter()
                    .map(|end| match end {
                        EdgeEnd::Node(node) => {
                            if !graph.contains_node(&node.id) {
                                graph.add_node(node.id.clone(), Attrs::new());
                            }
                            vec![node.id.clone()]
                        }
                        EdgeEnd::Subgraph(sub) => apply(&sub.stmts, graph),
                    })
                    .collect();
                for pair in groups.windows(2) {
                    for from in &pair[0] {
                        for to in &pair[1] {
                            let mut data = graph
                                .link(from, to)
                                .map(|l| l.data.clone())
                                .unwrap_or_default();
                            data.extend(attrs.iter().cloned());
                            graph.add_link(from.clone(), to.clone(), data);
                        }
                    }
                }
                for id in groups.iter().flatten() {
                    mention(&mut mentioned, id);
                }
            }
            Stmt::Subgraph(sub) => {
                for id in apply(&sub.stmts, graph) {
                    mention(&mut mentioned, &id);
                }
            }
            Stmt::Attr(_) | Stmt::Assign(..) => {}
        }
    }
    mentioned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr<'a>(attrs: &'a Attrs, key: &str) -> Option<&'a str> {
        attrs.get(key).map(String::as_str)
    }

    #[test]
    fn simple_digraph() {
        let g = load("digraph { a -> b; b -> c [label=\"x y\"]; }").unwrap();
        assert_eq!((g.node_count(), g.link_count()), (3, 2));
        let link = g.link(&"b".to_string(), &"c".to_string()).unwrap();
        assert_eq!(attr(link.data, "label"), Some("x y"));
        assert!(g.link(&"c".to_string(), &"b".to_string()).is_none());
    }

    #[test]
    fn edge_chains_and_subgraphs() {
        let g = load("graph G { a -- { b c } -- d }").unwrap();
        let mut links: Vec<(String, String)> = g
            .links()
            .map(|l| (l.from.clone(), l.to.clone()))
            .collect();
        links.sort();
        let expected: Vec<(String, String)> = [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]
            .iter()
            .map(|(f, t)| (f.to_string(), t.to_string()))
            .collect();
        assert_eq!(links, expected);
    }

    #[test]
    fn node_attributes_merge() {
        let text = r#"
            /* header */ digraph "flow" {
                // nodes
                in [shape=box, color=red]
                in [color=blue; label="start" + "er"]
                # preprocessor-style line
                node [shape=circle]
                rankdir = LR
                in:p1:n -> out
            }
        "#;
        let g = load(text).unwrap();
        let node = g.node(&"in".to_string()).unwrap();
        assert_eq!(attr(node.data, "shape"), Some("box"));
        assert_eq!(attr(node.data, "color"), Some("blue"));
        assert_eq!(attr(node.data, "label"), Some("starter"));
        assert_eq!(g.link_count(), 1);
    }

    #[test]
    fn ast_shape() {
        let graphs = parse("strict digraph { -1.5 -> <b<i>x</i>> [w=2] }").unwrap();
        assert_eq!(graphs.len(), 1);
        let g = &graphs[0];
        assert!(g.strict && g.directed);
        assert_eq!(g.id, None);
        match &g.stmts[..] {
            [Stmt::Edge(edge)] => {
                assert_eq!(edge.ends.len(), 2);
                assert!(matches!(&edge.ends[0], EdgeEnd::Node(n) if n.id == "-1.5"));
                assert!(matches!(&edge.ends[1], EdgeEnd::Node(n) if n.id == "b<i>x</i>"));
                assert_eq!(edge.attrs, vec![("w".to_string(), "2".to_string())]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn errors() {
        assert_eq!(load("").map(|_| ()), Err(DotError::NoGraph));
        assert_eq!(
            load("graph {} digraph {}").map(|_| ()),
            Err(DotError::MultipleGraphs(2))
        );
        match parse("digraph {\n  a -- b\n}") {
            Err(DotError::Syntax { line, column, .. }) => assert_eq!((line, column), (2, 5)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            parse("digraph { a -> \"b }"),
            Err(DotError::Syntax { .. })
        ));
        assert!(matches!(parse("digraph { a -> }"), Err(DotError::Syntax { .. })));
    }
}
