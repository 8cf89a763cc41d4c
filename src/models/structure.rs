//! # 晶体结构数据模型
//!
//! vasprun.xml 中最终结构（finalpos）的只读表示。
//!
//! ## 依赖关系
//! - 被 `parsers/vasprun.rs` 构造
//! - 被 `commands/analyze.rs`, `report/` 使用
//! - 无外部模块依赖

use std::collections::BTreeMap;

/// 晶格参数表示
#[derive(Debug, Clone)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)，角度单位：度
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;

        let a = norm(&a_vec);
        let b = norm(&b_vec);
        let c = norm(&c_vec);

        let alpha = (dot(&b_vec, &c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(&a_vec, &c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(&a_vec, &b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（取绝对值）
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;

        // 行列式
        (a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0]))
            .abs()
    }
}

fn dot(x: &[f64; 3], y: &[f64; 3]) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| a * b).sum()
}

fn norm(x: &[f64; 3]) -> f64 {
    dot(x, x).sqrt()
}

/// 原子位点
#[derive(Debug, Clone)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
        }
    }
}

/// 晶体结构
#[derive(Debug, Clone)]
pub struct Crystal {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子位点列表（顺序与 DOS 中的 ion 顺序一致）
    pub atoms: Vec<Atom>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
        }
    }

    /// 位点数
    pub fn site_count(&self) -> usize {
        self.atoms.len()
    }

    /// 按索引取位点，越界返回 None
    pub fn site(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    /// 按元素统计原子数（按元素首次出现顺序）
    fn element_counts(&self) -> Vec<(&str, usize)> {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            let entry = counts.entry(atom.element.as_str()).or_insert(0);
            if *entry == 0 {
                order.push(atom.element.as_str());
            }
            *entry += 1;
        }

        order.into_iter().map(|el| (el, counts[el])).collect()
    }

    /// 完整化学式，例如 `Fe2 O3`
    pub fn formula(&self) -> String {
        self.element_counts()
            .into_iter()
            .map(|(el, count)| format!("{}{}", el, count))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 约化化学式，例如 `Fe2O3`（计数为 1 时省略）
    pub fn reduced_formula(&self) -> String {
        let counts = self.element_counts();
        let divisor = counts.iter().fold(0, |acc, (_, n)| gcd(acc, *n)).max(1);

        counts
            .into_iter()
            .map(|(el, count)| {
                let n = count / divisor;
                if n == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, n)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
