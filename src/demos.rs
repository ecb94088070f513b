use clap::ValueEnum;

use crate::coherence::CoherenceDemo;
use crate::coloring::FourColorDemo;
use crate::cosmology::{ExpansionDemo, LorentzDemo, UniverseDemo};
use crate::geometry::{CensusDemo, ManifoldDemo, ThurstonDemo};
use crate::harness::Demo;
use crate::knots::KnotDemo;
use crate::primes::{PrimeDistributionDemo, PrimeExplorerDemo, PrimeSolarSystemDemo, TwinPrimeDemo};
use crate::tesseract::{TesseractDemo, TesseractView};
use crate::zeta::ZetaDemo;

/// Every demonstration the binary can run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DemoKind {
    #[default]
    Tesseract,
    TesseractColor,
    TesseractRotation,
    PrimeDistribution,
    PrimeExplorer,
    PrimeSolarSystem,
    TwinPrimes,
    Zeta,
    Universe,
    Expansion,
    Lorentz,
    Coherence,
    Knots,
    Manifolds,
    Thurston,
    Census,
    FourColor,
    FourColorRandom,
}

impl DemoKind {
    /// Command-line name, e.g. `prime-explorer`.
    pub fn name(self) -> String {
        self.to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_else(|| format!("{:?}", self))
    }

    pub fn all() -> &'static [DemoKind] {
        DemoKind::value_variants()
    }

    /// Construct the demo. `seed` feeds every random dataset.
    pub fn build(self, seed: u64) -> Box<dyn Demo> {
        match self {
            DemoKind::Tesseract => Box::new(TesseractDemo::new(TesseractView::Projection)),
            DemoKind::TesseractColor => Box::new(TesseractDemo::new(TesseractView::WAsColor)),
            DemoKind::TesseractRotation => Box::new(TesseractDemo::new(TesseractView::Rotation)),
            DemoKind::PrimeDistribution => Box::new(PrimeDistributionDemo::new(1_000_000)),
            DemoKind::PrimeExplorer => Box::new(PrimeExplorerDemo::default()),
            DemoKind::PrimeSolarSystem => Box::new(PrimeSolarSystemDemo::new(10_000, 100_000)),
            DemoKind::TwinPrimes => Box::new(TwinPrimeDemo),
            DemoKind::Zeta => Box::new(ZetaDemo),
            DemoKind::Universe => Box::new(UniverseDemo),
            DemoKind::Expansion => Box::new(ExpansionDemo::new(seed)),
            DemoKind::Lorentz => Box::new(LorentzDemo::new(seed)),
            DemoKind::Coherence => Box::new(CoherenceDemo::default()),
            DemoKind::Knots => Box::new(KnotDemo),
            DemoKind::Manifolds => Box::new(ManifoldDemo),
            DemoKind::Thurston => Box::new(ThurstonDemo),
            DemoKind::Census => Box::new(CensusDemo::new(1000, seed)),
            DemoKind::FourColor => Box::new(FourColorDemo::sample(seed)),
            DemoKind::FourColorRandom => Box::new(FourColorDemo::random(10, 0.4, seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_kebab_case() {
        assert_eq!(DemoKind::Tesseract.name(), "tesseract");
        assert_eq!(DemoKind::FourColorRandom.name(), "four-color-random");
        assert_eq!(DemoKind::from_str("prime-explorer", true), Ok(DemoKind::PrimeExplorer));
        assert_eq!(DemoKind::default(), DemoKind::Tesseract);
    }

    #[test]
    fn every_cheap_demo_builds_and_renders() {
        // the million-prime sieve and the long zeta sweep are covered in their own modules
        let slow = [DemoKind::PrimeDistribution, DemoKind::PrimeSolarSystem];
        for &kind in DemoKind::all().iter().filter(|k| !slow.contains(k)) {
            let demo = kind.build(5);
            let params = demo.defaults();
            assert!(!demo.title().is_empty(), "{:?}", kind);
            assert!(!demo.generate(&params).is_empty(), "{:?} generated nothing", kind);
        }
    }
}
