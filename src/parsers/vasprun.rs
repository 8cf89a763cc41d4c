//! # VASP vasprun.xml 解析器
//!
//! 从 vasprun.xml 中提取费米能级、最终结构与投影态密度 (PDOS)。
//!
//! ## 读取的节点
//! ```text
//! <modeling>
//!   <incar><i name="SYSTEM">...</i></incar>          # 结构名称（可选）
//!   <atominfo><array name="atoms"><set><rc><c>Fe</c>...   # 元素
//!   <structure name="finalpos">
//!     <crystal><varray name="basis"><v>..</v>x3     # 晶格
//!     <varray name="positions"><v>..</v>...         # 分数坐标
//!   <calculation>
//!     <dos>
//!       <i name="efermi"> ... </i>
//!       <partial><array>
//!         <field>energy</field><field>s</field>...
//!         <set><set comment="ion 1"><set comment="spin 1"><r>..</r>...
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 调用
//! - 使用 `models/structure.rs`, `models/dos.rs`
//! - 使用 `roxmltree` 解析 XML

use crate::error::{DbandError, Result};
use crate::models::{Atom, CompleteDos, Crystal, Lattice};

use roxmltree::{Document, Node};
use std::fs;
use std::path::Path;

const FORMAT: &str = "vasprun.xml";

/// 各位点/自旋能量网格允许的差异 (eV)
const GRID_TOLERANCE: f64 = 1e-6;

/// vasprun.xml 中与 DOS 分析相关的内容
#[derive(Debug, Clone)]
pub struct Vasprun {
    pub crystal: Crystal,
    pub dos: CompleteDos,
}

/// 解析 vasprun.xml 文件
pub fn parse_vasprun_file(path: &Path) -> Result<Vasprun> {
    if !path.exists() {
        return Err(DbandError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let bytes = fs::read(path).map_err(|e| DbandError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let content = decode(bytes);

    let default_name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    parse_vasprun_content(&content, &path.display().to_string(), default_name)
}

/// 从字符串内容解析 vasprun.xml
///
/// `source` 仅用于错误信息，`default_name` 在缺少 SYSTEM 标签时作为结构名称。
pub fn parse_vasprun_content(content: &str, source: &str, default_name: &str) -> Result<Vasprun> {
    let doc = Document::parse(content).map_err(|e| parse_error(source, e.to_string()))?;
    let root = doc.root_element();

    let name = system_name(root).unwrap_or_else(|| default_name.to_string());
    let crystal = parse_structure(root, source, name)?;

    let dos_node = root
        .descendants()
        .filter(|n| n.has_tag_name("dos"))
        .filter(|n| find_named(*n, "i", "efermi").is_some())
        .last()
        .ok_or_else(|| missing(source, "efermi"))?;

    let efermi = find_named(dos_node, "i", "efermi")
        .and_then(|n| n.text())
        .ok_or_else(|| missing(source, "efermi"))
        .and_then(|t| parse_f64(t, source, "efermi"))?;

    let dos = parse_partial_dos(dos_node, efermi, source)?;

    if dos.site_count() != crystal.site_count() {
        return Err(parse_error(
            source,
            format!(
                "Partial DOS has {} ions but the structure has {} sites",
                dos.site_count(),
                crystal.site_count()
            ),
        ));
    }

    Ok(Vasprun { crystal, dos })
}

/// vasprun.xml 声明为 ISO-8859-1；非 UTF-8 内容按 Latin-1 逐字节解码
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

// ─────────────────────────────────────────────────────────────
// 结构
// ─────────────────────────────────────────────────────────────

fn system_name(root: Node) -> Option<String> {
    root.children()
        .find(|n| n.has_tag_name("incar"))
        .and_then(|incar| find_named(incar, "i", "SYSTEM"))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn parse_structure(root: Node, source: &str, name: String) -> Result<Crystal> {
    // 优先 finalpos，否则取文档中最后一个结构
    let structure = root
        .children()
        .find(|n| n.has_tag_name("structure") && n.attribute("name") == Some("finalpos"))
        .or_else(|| root.descendants().filter(|n| n.has_tag_name("structure")).last())
        .ok_or_else(|| missing(source, "structure"))?;

    let basis = structure
        .children()
        .find(|n| n.has_tag_name("crystal"))
        .and_then(|c| find_named(c, "varray", "basis"))
        .ok_or_else(|| missing(source, "structure/crystal/basis"))?;

    let vectors = parse_varray(basis, source)?;
    if vectors.len() != 3 {
        return Err(parse_error(
            source,
            format!("Lattice basis has {} vectors, expected 3", vectors.len()),
        ));
    }
    let lattice = Lattice::from_vectors([vectors[0], vectors[1], vectors[2]]);

    let positions = find_named(structure, "varray", "positions")
        .ok_or_else(|| missing(source, "structure/positions"))
        .and_then(|n| parse_varray(n, source))?;

    let elements = parse_atom_labels(root, source)?;
    if elements.len() != positions.len() {
        return Err(parse_error(
            source,
            format!(
                "atominfo lists {} atoms but the structure has {} positions",
                elements.len(),
                positions.len()
            ),
        ));
    }

    let atoms = elements
        .into_iter()
        .zip(positions)
        .map(|(el, pos)| Atom::new(el, pos))
        .collect();

    Ok(Crystal::new(name, lattice, atoms))
}

fn parse_atom_labels(root: Node, source: &str) -> Result<Vec<String>> {
    let array = root
        .children()
        .find(|n| n.has_tag_name("atominfo"))
        .and_then(|info| find_named(info, "array", "atoms"))
        .ok_or_else(|| missing(source, "atominfo"))?;

    let set = child(array, "set").ok_or_else(|| missing(source, "atominfo/atoms/set"))?;

    set.children()
        .filter(|n| n.has_tag_name("rc"))
        .map(|rc| {
            child(rc, "c")
                .and_then(|c| c.text())
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| parse_error(source, "Empty element label in atominfo".to_string()))
        })
        .collect()
}

/// 解析 `<varray>` 下的 3 分量向量
fn parse_varray(node: Node, source: &str) -> Result<Vec<[f64; 3]>> {
    node.children()
        .filter(|n| n.has_tag_name("v"))
        .map(|v| {
            let values = parse_row(v.text().unwrap_or(""), source)?;
            if values.len() < 3 {
                return Err(parse_error(
                    source,
                    format!("Vector with {} components in <varray>", values.len()),
                ));
            }
            Ok([values[0], values[1], values[2]])
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────
// 投影态密度
// ─────────────────────────────────────────────────────────────

fn parse_partial_dos(dos_node: Node, efermi: f64, source: &str) -> Result<CompleteDos> {
    let array = child(dos_node, "partial")
        .and_then(|p| child(p, "array"))
        .ok_or_else(|| missing(source, "partial DOS"))?;

    let fields: Vec<String> = array
        .children()
        .filter(|n| n.has_tag_name("field"))
        .map(|f| f.text().unwrap_or("").trim().to_string())
        .collect();

    match fields.first() {
        Some(first) if first == "energy" => {}
        _ => {
            return Err(parse_error(
                source,
                "Partial DOS fields must start with 'energy'".to_string(),
            ))
        }
    }
    let orbitals = fields[1..].to_vec();

    let ions_set = child(array, "set").ok_or_else(|| missing(source, "partial DOS data"))?;

    let mut energies: Option<Vec<f64>> = None;
    let mut projections: Vec<Vec<Vec<Vec<f64>>>> = Vec::new();

    for ion in ions_set.children().filter(|n| n.has_tag_name("set")) {
        let mut spins = Vec::new();

        for spin in ion.children().filter(|n| n.has_tag_name("set")) {
            let rows = spin
                .children()
                .filter(|n| n.has_tag_name("r"))
                .map(|r| parse_row(r.text().unwrap_or(""), source))
                .collect::<Result<Vec<_>>>()?;

            let grid: Vec<f64> = rows.iter().map(|r| r.first().copied().unwrap_or(0.0)).collect();
            match &energies {
                None => energies = Some(grid),
                Some(e) if e.len() != grid.len() => {
                    return Err(parse_error(
                        source,
                        format!(
                            "Inconsistent DOS grid: {} points vs {} points",
                            grid.len(),
                            e.len()
                        ),
                    ))
                }
                Some(e) => {
                    if let Some(i) = e
                        .iter()
                        .zip(grid.iter())
                        .position(|(a, b)| (a - b).abs() > GRID_TOLERANCE)
                    {
                        return Err(parse_error(
                            source,
                            format!(
                                "Inconsistent DOS grid at point {}: {} eV vs {} eV",
                                i, grid[i], e[i]
                            ),
                        ));
                    }
                }
            }

            // 行 → 列 [orbital][grid]
            let mut columns = vec![Vec::with_capacity(rows.len()); orbitals.len()];
            for row in &rows {
                if row.len() != fields.len() {
                    return Err(parse_error(
                        source,
                        format!(
                            "Partial DOS row has {} values, expected {}",
                            row.len(),
                            fields.len()
                        ),
                    ));
                }
                for (col, value) in columns.iter_mut().zip(row[1..].iter()) {
                    col.push(*value);
                }
            }

            spins.push(columns);
        }

        if let Some(first) = projections.first() {
            if first.len() != spins.len() {
                return Err(parse_error(
                    source,
                    "Ions have different numbers of spin channels".to_string(),
                ));
            }
        }
        projections.push(spins);
    }

    let energies = energies
        .filter(|e| e.len() >= 2)
        .ok_or_else(|| parse_error(source, "Partial DOS has no energy grid".to_string()))?;

    Ok(CompleteDos {
        efermi,
        energies,
        orbitals,
        projections,
    })
}

// ─────────────────────────────────────────────────────────────
// 辅助函数
// ─────────────────────────────────────────────────────────────

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

/// 查找 `<tag name="...">` 子节点
fn find_named<'a, 'input>(node: Node<'a, 'input>, tag: &str, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.has_tag_name(tag) && n.attribute("name") == Some(name))
}

fn parse_row(text: &str, source: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|s| parse_f64(s, source, "numeric row"))
        .collect()
}

fn parse_f64(text: &str, source: &str, what: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| parse_error(source, format!("Invalid number '{}' in {}", text.trim(), what)))
}

fn parse_error(source: &str, reason: String) -> DbandError {
    DbandError::ParseError {
        format: FORMAT.to_string(),
        path: source.to_string(),
        reason,
    }
}

fn missing(source: &str, section: &str) -> DbandError {
    DbandError::MissingSection {
        section: section.to_string(),
        path: source.to_string(),
    }
}
