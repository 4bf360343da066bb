//! Fixed factor weights.

/// Weights applied to each factor score before modifiers.
pub const FACTOR_WEIGHTS: Weights = Weights {
    skills: 0.40,
    location: 0.20,
    opportunity_type: 0.15,
    experience: 0.10,
    company: 0.10,
    keywords: 0.05,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub skills: f64,
    pub location: f64,
    pub opportunity_type: f64,
    pub experience: f64,
    pub company: f64,
    pub keywords: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn without_skills(w: &Weights) -> f64 {
        w.location + w.opportunity_type + w.experience + w.company + w.keywords
    }

    #[test]
    fn weights_sum_to_one() {
        let total = FACTOR_WEIGHTS.skills + without_skills(&FACTOR_WEIGHTS);
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weights_without_skills_sum_to_sixty_percent() {
        assert!((without_skills(&FACTOR_WEIGHTS) - 0.60).abs() < 1e-9);
    }
}
