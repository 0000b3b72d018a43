use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub currency: &'static str,
    pub interval: &'static str,
    pub features: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pricing {
    pub plans: Vec<Plan>,
}

/// The static subscription price list
pub fn pricing() -> Pricing {
    Pricing {
        plans: vec![
            Plan {
                id: "basic",
                name: "Basic Plan",
                price: 29.99,
                currency: "usd",
                interval: "month",
                features: vec![
                    "Access to UX Workflow Agent",
                    "Basic UX knowledge base",
                    "5 conversations per month",
                ],
            },
            Plan {
                id: "premium",
                name: "Premium Plan",
                price: 99.99,
                currency: "usd",
                interval: "month",
                features: vec![
                    "Access to all UX agents",
                    "Full UX knowledge base",
                    "Unlimited conversations",
                    "Priority support",
                    "Advanced analytics",
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_serialization() {
        let value = serde_json::to_value(pricing()).unwrap();
        let plans = value["plans"].as_array().unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0]["id"], "basic");
        assert_eq!(plans[0]["price"], 29.99);
        assert_eq!(plans[1]["id"], "premium");
        assert_eq!(plans[1]["price"], 99.99);
        assert_eq!(plans[1]["currency"], "usd");
        assert_eq!(plans[1]["features"].as_array().unwrap().len(), 5);
    }
}
