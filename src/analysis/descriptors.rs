//! # 能带描述符计算器
//!
//! 对指定位点、指定轨道类型，分别计算两个自旋通道的
//! 能带中心、填充率、偏度、峰度与宽度。
//!
//! ## 窗口约定
//! - 中心、偏度、峰度：宽窗口（默认 [-15, 15] eV）
//! - 宽度：占据态窗口（默认 [-15, 0] eV）
//! - 填充率：与窗口无关
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 调用
//! - 使用 `analysis/moments.rs`
//! - 使用 `models/` 的 CompleteDos, Crystal, AnalysisResult

use crate::analysis::moments::{self, WindowedDos};
use crate::error::{DbandError, Result};
use crate::models::{
    AnalysisConfig, AnalysisResult, CompleteDos, Crystal, EnergyWindow, OrbitalType, Spin,
    SpinPair,
};

/// 单个自旋通道的描述符
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinDescriptors {
    pub center: f64,
    pub filling: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub width: f64,
}

/// 能带描述符计算器
pub struct BandAnalyzer {
    orbital: OrbitalType,
    full_window: EnergyWindow,
    occupied_window: EnergyWindow,
}

impl BandAnalyzer {
    pub fn new(orbital: OrbitalType, full_window: EnergyWindow, occupied_window: EnergyWindow) -> Self {
        Self {
            orbital,
            full_window,
            occupied_window,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.orbital, config.full_window, config.occupied_window)
    }

    /// 计算位点的全部描述符
    ///
    /// 调用方需保证 `site_index` 已经过校验。
    pub fn analyze(
        &self,
        dos: &CompleteDos,
        crystal: &Crystal,
        site_index: usize,
    ) -> Result<AnalysisResult> {
        let site = crystal
            .site(site_index)
            .ok_or(DbandError::SiteIndexOutOfRange {
                index: site_index,
                count: crystal.site_count(),
            })?;

        let energies = dos.shifted_energies();

        let up = self.spin_descriptors(&energies, dos, site_index, Spin::Up)?;
        let down = self.spin_descriptors(&energies, dos, site_index, Spin::Down)?;

        Ok(AnalysisResult {
            fermi_energy: dos.efermi,
            site_index,
            site_element: site.element.clone(),
            orbital: self.orbital,
            band_centers: SpinPair::new(up.center, down.center),
            band_fillings: SpinPair::new(up.filling, down.filling),
            band_skewness: SpinPair::new(up.skewness, down.skewness),
            band_kurtosis: SpinPair::new(up.kurtosis, down.kurtosis),
            band_widths: SpinPair::new(up.width, down.width),
        })
    }

    /// 计算单个自旋通道的描述符
    pub fn spin_descriptors(
        &self,
        energies: &[f64],
        dos: &CompleteDos,
        site_index: usize,
        spin: Spin,
    ) -> Result<SpinDescriptors> {
        let densities = dos.orbital_dos(site_index, spin, self.orbital)?;

        let full = self.window(energies, &densities, &self.full_window, spin)?;
        let occupied = self.window(energies, &densities, &self.occupied_window, spin)?;

        let filling = moments::filling(energies, &densities).ok_or_else(|| DbandError::ZeroDensity {
            orbital: self.orbital.to_string(),
            spin: spin.to_string(),
            min: energies.first().copied().unwrap_or(0.0),
            max: energies.last().copied().unwrap_or(0.0),
        })?;

        Ok(SpinDescriptors {
            center: full.center(),
            filling,
            skewness: full.skewness(),
            kurtosis: full.kurtosis(),
            width: occupied.width(),
        })
    }

    fn window(
        &self,
        energies: &[f64],
        densities: &[f64],
        window: &EnergyWindow,
        spin: Spin,
    ) -> Result<WindowedDos> {
        let windowed = WindowedDos::new(energies, densities, window).ok_or(DbandError::EmptyWindow {
            min: window.min,
            max: window.max,
        })?;

        if windowed.is_degenerate() {
            return Err(DbandError::ZeroDensity {
                orbital: self.orbital.to_string(),
                spin: spin.to_string(),
                min: window.min,
                max: window.max,
            });
        }

        Ok(windowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::moments::tests::gaussian;
    use crate::models::config::{DEFAULT_FULL_WINDOW, DEFAULT_OCCUPIED_WINDOW};
    use crate::models::{Atom, Lattice};

    fn grid() -> Vec<f64> {
        (0..=4000).map(|i| -20.0 + 0.01 * i as f64).collect()
    }

    /// 以相对费米能级的能量求值
    fn column(energies: &[f64], efermi: f64, f: impl Fn(f64) -> f64) -> Vec<f64> {
        energies.iter().map(|&e| f(e - efermi)).collect()
    }

    /// 单位点、两自旋、仅含 s 与 dxy 两列的态密度（s 列为零）
    fn single_site(
        efermi: f64,
        up: impl Fn(f64) -> f64,
        down: impl Fn(f64) -> f64,
    ) -> (CompleteDos, Crystal) {
        let energies = grid();
        let n = energies.len();

        let dos = CompleteDos {
            efermi,
            orbitals: vec!["s".into(), "dxy".into()],
            projections: vec![vec![
                vec![vec![0.0; n], column(&energies, efermi, up)],
                vec![vec![0.0; n], column(&energies, efermi, down)],
            ]],
            energies,
        };
        let crystal = Crystal::new(
            "Ni",
            Lattice::from_vectors([[3.5, 0.0, 0.0], [0.0, 3.5, 0.0], [0.0, 0.0, 3.5]]),
            vec![Atom::new("Ni", [0.0, 0.0, 0.0])],
        );
        (dos, crystal)
    }

    fn analyzer() -> BandAnalyzer {
        BandAnalyzer::new(OrbitalType::D, DEFAULT_FULL_WINDOW, DEFAULT_OCCUPIED_WINDOW)
    }

    #[test]
    fn test_spin_split_gaussians() {
        let (dos, crystal) = single_site(
            0.0,
            |e| gaussian(e, -2.0, 1.0),
            |e| gaussian(e, -1.0, 1.0),
        );

        let result = analyzer().analyze(&dos, &crystal, 0).unwrap();

        assert_eq!(result.site_element, "Ni");
        assert!((result.band_centers.spin_up + 2.0).abs() < 1e-3);
        assert!((result.band_centers.spin_down + 1.0).abs() < 1e-3);
        assert!(result.band_fillings.spin_up > result.band_fillings.spin_down);
        assert_eq!(
            result.magnetic_moment(),
            result.band_fillings.spin_up - result.band_fillings.spin_down
        );

        for width in [result.band_widths.spin_up, result.band_widths.spin_down] {
            assert!(width >= 0.0);
            assert!(width <= DEFAULT_OCCUPIED_WINDOW.max - DEFAULT_OCCUPIED_WINDOW.min);
        }
    }

    #[test]
    fn test_energies_are_relative_to_fermi_level() {
        // 绝对能量 3 eV 处的峰，费米能级 5 eV → 相对 -2 eV
        let (dos, crystal) = single_site(
            5.0,
            |e| gaussian(e, -2.0, 0.5),
            |e| gaussian(e, -2.0, 0.5),
        );

        let result = analyzer().analyze(&dos, &crystal, 0).unwrap();
        assert_eq!(result.fermi_energy, 5.0);
        assert!((result.band_centers.spin_up + 2.0).abs() < 1e-3);
        assert!(result.band_fillings.spin_up > 0.99);
        assert!(result.magnetic_moment().abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_gaussian_shape() {
        let (dos, crystal) = single_site(
            0.0,
            |e| gaussian(e, 0.0, 1.0),
            |e| gaussian(e, 0.0, 1.0),
        );

        let result = analyzer().analyze(&dos, &crystal, 0).unwrap();
        assert!(result.band_skewness.spin_up.abs() < 1e-3);
        assert!((result.band_kurtosis.spin_down - 3.0).abs() < 1e-2);
        assert!((result.band_fillings.spin_up - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_missing_spin_down() {
        let (mut dos, crystal) = single_site(0.0, |e| gaussian(e, 0.0, 1.0), |_| 0.0);
        dos.projections[0].truncate(1);

        let err = analyzer().analyze(&dos, &crystal, 0).unwrap_err();
        assert!(matches!(err, DbandError::MissingSpinChannel { .. }));
    }

    #[test]
    fn test_zero_density_window() {
        // 自旋向下的 d 态全部位于占据窗口之外
        let (dos, crystal) = single_site(
            0.0,
            |e| gaussian(e, -2.0, 1.0),
            |e| if e > 1.0 { 1.0 } else { 0.0 },
        );

        let err = analyzer().analyze(&dos, &crystal, 0).unwrap_err();
        assert!(matches!(err, DbandError::ZeroDensity { ref spin, .. } if spin == "down"));
    }

    #[test]
    fn test_missing_orbital() {
        let (dos, crystal) = single_site(0.0, |e| gaussian(e, 0.0, 1.0), |e| gaussian(e, 0.0, 1.0));
        let f_analyzer = BandAnalyzer::new(OrbitalType::F, DEFAULT_FULL_WINDOW, DEFAULT_OCCUPIED_WINDOW);

        let err = f_analyzer.analyze(&dos, &crystal, 0).unwrap_err();
        assert!(matches!(err, DbandError::MissingOrbital { .. }));
    }
}
