use crate::extract::FlowRecord;
use super::features::scale;
use super::{Classifier, Features, Label};

#[derive(Clone, Debug, PartialEq)]
pub struct Exemplar {
    pub label: Label,
    pub rate:  f64,
    pub size:  f64,
}

// Stateless nearest neighbour over a fixed reference set.
#[derive(Clone, Debug)]
pub struct Nearest {
    exemplars: Vec<Exemplar>,
}

impl Exemplar {
    pub fn new(label: &str, rate: f64, size: f64) -> Self {
        Self {
            label: Label::new(label),
            rate:  rate,
            size:  size,
        }
    }

    fn distance(&self, f: &Features) -> f64 {
        let rate = scale(f.rate) - scale(self.rate);
        let size = match f.size {
            Some(size) => scale(size) - scale(self.size),
            None       => 0.0,
        };
        rate * rate + size * size
    }
}

impl Nearest {
    pub fn new(exemplars: Vec<Exemplar>) -> Self {
        Self { exemplars }
    }
}

// Packet rate band limits in packets per second.
const CUTS: [f64; 3] = [10.0, 100.0, 1000.0];

impl Default for Nearest {
    fn default() -> Self {
        let bands = [("Low", 64.0), ("Medium", 512.0), ("High", 1000.0), ("Very High", 1400.0)];
        let rates = centres(&CUTS);

        Self::new(bands.iter().zip(rates).map(|(&(label, size), rate)| {
            Exemplar::new(label, rate, size)
        }).collect())
    }
}

// Rates whose scaled midpoints fall on the given cut points, so a record
// without a size feature is labelled by the band its rate falls in.
fn centres(cuts: &[f64]) -> Vec<f64> {
    let cuts = cuts.iter().map(|&c| scale(c)).collect::<Vec<_>>();
    let half = match cuts.as_slice() {
        [a, b, ..] => (b - a) / 2.0,
        _          => 0.5,
    };

    let mut centre  = match cuts.first() {
        Some(first) => first - half,
        None        => return vec![0.0],
    };
    let mut centres = vec![centre];
    for cut in &cuts {
        centre = 2.0 * cut - centre;
        centres.push(centre);
    }

    centres.into_iter().map(|c| (10f64.powf(c) - 1.0).max(0.0)).collect()
}

impl Classifier for Nearest {
    type State = ();

    fn classify(&self, record: &FlowRecord, state: ()) -> (Label, ()) {
        let features = match Features::extract(record) {
            Some(features) => features,
            None           => return (Label::unknown(), state),
        };

        let mut best: Option<(f64, &Exemplar)> = None;
        for exemplar in &self.exemplars {
            let d = exemplar.distance(&features);
            match best {
                Some((min, _)) if min <= d => (),
                _                          => best = Some((d, exemplar)),
            }
        }

        match best {
            Some((_, exemplar)) => (exemplar.label.clone(), state),
            None                => (Label::unknown(), state),
        }
    }
}
