//! In-memory model of the UCD "grouped" XML dataset.
//!
//! Only the parts needed to name code points are kept: the repertoire's
//! groups, their `scx`/`blk` attributes, and each `char`'s `cp`, `na` and
//! `name-alias` children. Attributes that are absent decode as empty
//! strings.


use std::io::Read;

use roxmltree::Node;

use crate::error::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Text of the `description` element, usually the Unicode version.
    pub description: Option<String>,
    pub repertoire: Repertoire,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repertoire {
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub script: String,
    pub block: String,
    pub characters: Vec<Character>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Character {
    /// Hex digits without a `0x` prefix. Empty for range entries.
    pub code_point: String,
    pub name: String,
    pub name_aliases: Vec<NameAlias>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameAlias {
    pub alias: String,
}

impl Group {
    /// Groups without a script or without characters produce no output.
    pub fn is_empty(&self) -> bool {
        self.script.is_empty() || self.characters.is_empty()
    }
}

impl Document {
    pub fn parse(text: &str) -> Result<Self, Error> {
        let doc = roxmltree::Document::parse(text)?;
        let root = doc.root_element();
        if root.tag_name().name() != "ucd" {
            return Err(Error::parse(
                "xml",
                format!("expected root element <ucd>, found <{}>", root.tag_name().name()),
            ));
        }

        let description = child_elements(root, "description")
            .next()
            .map(|node| node.text().unwrap_or_default().trim().to_string());

        let groups = match child_elements(root, "repertoire").next() {
            Some(repertoire) => child_elements(repertoire, "group").map(group).collect(),
            None => Vec::new(),
        };

        Ok(Document {
            description,
            repertoire: Repertoire { groups },
        })
    }

    /// Reads the whole stream and parses it. The dataset is bounded, so the
    /// document is materialized in one go.
    pub fn from_reader(reader: &mut dyn Read) -> Result<Self, Error> {
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|e| Error::io("read xml", e))?;
        let text = std::str::from_utf8(&buf).map_err(|e| Error::parse("xml", e))?;
        Self::parse(text)
    }
}

fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn attr(node: Node, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

fn group(node: Node) -> Group {
    Group {
        script: attr(node, "scx"),
        block: attr(node, "blk"),
        characters: child_elements(node, "char").map(character).collect(),
    }
}

fn character(node: Node) -> Character {
    Character {
        code_point: attr(node, "cp"),
        name: attr(node, "na"),
        name_aliases: child_elements(node, "name-alias")
            .map(|alias| NameAlias {
                alias: attr(alias, "alias"),
            })
            .collect(),
    }
}
