//! Prompt assembly for the AI endpoints.
//!
//! Every AI request starts from [`system_prompt`], which frames the model as
//! the PocketSmart assistant and embeds the user's current budget summary.
//! The per-endpoint builders append their task on top of that frame.

use serde_json::Value;

use crate::budget::BudgetSummary;

/// Persona and budget context sent ahead of every AI task.
pub fn system_prompt(name: &str, summary: &BudgetSummary) -> String {
    let categories = serde_json::to_string(&summary.spending_by_category).unwrap_or_default();
    let violations = serde_json::to_string(&summary.budget_violations).unwrap_or_default();
    format!(
        "You are PocketSmart AI — a warm, smart personal finance assistant.\n\
         \n\
         USER: {name} | Income: {currency} {income}/mo\n\
         Spent: {currency} {spent} | Remaining: {currency} {remaining}\n\
         Categories: {categories}\n\
         Violations: {violations}\n\
         Savings: {currency} {saved} / {currency} {goal} ({pct}%)\n\
         \n\
         Be concise, warm, use emojis, specific with numbers. Use {currency} currency symbol.\n",
        currency = summary.currency,
        income = summary.monthly_income,
        spent = summary.total_spent,
        remaining = summary.remaining_balance,
        saved = summary.savings_saved,
        goal = summary.savings_goal,
        pct = summary.savings_progress_pct,
    )
}

/// Structured spending-analysis task for the given focus area.
pub fn analysis_prompt(system: &str, focus: &str) -> String {
    format!(
        "{system}\n\
         \n\
         Perform a detailed {focus} spending analysis:\n\
         1. 📊 Key observations\n\
         2. ⚠️ Top 3 concerns with numbers\n\
         3. 💡 3 actionable recommendations with specific amounts\n\
         4. 🏆 Health score explanation\n\
         5. 🌟 Motivational closing\n\
         \n\
         Keep under 300 words, use emojis per section."
    )
}

/// Recommendation task for one of the supported shopping themes. Unknown
/// themes get the general money-saving variant.
pub fn recommendations_prompt(system: &str, rec_type: &str, currency: &str, balance: f64) -> String {
    match rec_type {
        "home" => format!(
            "{system}\n\
             Home upgrade budget = {currency} {balance}. Recommend 5 furniture/decor items.\n\
             Return ONLY valid JSON array:\n\
             [{{\"title\":\"name\",\"category\":\"Furniture/Decor/Lighting\",\"estimated_price\":100,\"platform\":\"Amazon/IKEA/Wayfair\",\"description\":\"2 sentences.\",\"priority\":\"high\",\"tip\":\"saving tip\"}}]"
        ),
        "party" => format!(
            "{system}\n\
             Party budget = {currency} {balance}. Smart allocation plan for 5 tips.\n\
             Return ONLY valid JSON array:\n\
             [{{\"title\":\"tip\",\"category\":\"venue/food/decor/entertainment\",\"estimated_cost\":100,\"description\":\"2 sentences.\",\"priority\":\"high\"}}]"
        ),
        "jewelry" => format!(
            "{system}\n\
             Jewelry budget = {currency} {balance}. Recommend 5 occasion-based pieces.\n\
             Return ONLY valid JSON array:\n\
             [{{\"title\":\"item\",\"occasion\":\"wedding/casual/formal/festive\",\"estimated_price\":100,\"style_tip\":\"outfit advice\",\"where_to_buy\":\"platform\",\"description\":\"2 sentences.\",\"priority\":\"high\"}}]"
        ),
        _ => format!(
            "{system}\n\
             Give 5 personalized money-saving recommendations.\n\
             Return ONLY valid JSON array:\n\
             [{{\"title\":\"title\",\"category\":\"category\",\"potential_savings\":50,\"description\":\"2-3 sentences.\",\"priority\":\"high\"}}]"
        ),
    }
}

/// Two-paragraph spending forecast task from the projection numbers.
pub fn forecast_prompt(
    system: &str,
    currency: &str,
    spent: f64,
    days_elapsed: i64,
    projected: f64,
) -> String {
    format!(
        "{system}\n\
         Spent {currency} {spent:.2} in {days_elapsed} days. Projected: {currency} {projected:.2}/month.\n\
         Write 2 paragraphs: forecast + one improvement tip. Under 150 words."
    )
}

/// Best-effort JSON recovery from model output.
///
/// Markdown-fenced responses are unwrapped first (the content of the first
/// fence, minus a leading `json` language tag). Returns None when whatever
/// remains is not valid JSON.
pub fn extract_json(text: &str) -> Option<Value> {
    let mut clean = text.trim();
    if clean.contains("```") {
        let mut parts = clean.split("```");
        clean = parts.nth(1).unwrap_or(clean);
        clean = clean.strip_prefix("json").unwrap_or(clean);
    }
    serde_json::from_str(clean.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::summarize;
    use crate::ledger::{Expense, UserLedger};

    fn sample_summary() -> BudgetSummary {
        let mut ledger = UserLedger::new("u1");
        ledger.monthly_income = 2000.0;
        ledger.savings_goal = 500.0;
        ledger.savings_saved = 100.0;
        ledger
            .expenses
            .push(Expense::new("Food".to_string(), 250.0, String::new(), None));
        summarize(&ledger)
    }

    #[test]
    fn system_prompt_embeds_budget_context() {
        let prompt = system_prompt("Ada", &sample_summary());
        assert!(prompt.starts_with("You are PocketSmart AI"));
        assert!(prompt.contains("USER: Ada | Income: USD 2000/mo"));
        assert!(prompt.contains("\"Food\":250.0"));
        assert!(prompt.contains("(20%)"));
    }

    #[test]
    fn recommendation_themes_select_their_template() {
        let sys = "SYS";
        assert!(recommendations_prompt(sys, "home", "USD", 100.0).contains("furniture/decor"));
        assert!(recommendations_prompt(sys, "party", "USD", 100.0).contains("Party budget"));
        assert!(recommendations_prompt(sys, "jewelry", "USD", 100.0).contains("occasion-based"));
        assert!(recommendations_prompt(sys, "general", "USD", 100.0).contains("money-saving"));
        // anything unrecognized falls back to the general template
        assert!(recommendations_prompt(sys, "spaceships", "USD", 100.0).contains("money-saving"));
    }

    #[test]
    fn forecast_prompt_formats_two_decimals() {
        let prompt = forecast_prompt("SYS", "USD", 450.0, 15, 900.0);
        assert!(prompt.contains("Spent USD 450.00 in 15 days."));
        assert!(prompt.contains("Projected: USD 900.00/month."));
    }

    #[test]
    fn extract_json_handles_fenced_blocks() {
        let fenced = "```json\n[{\"title\": \"Cook at home\"}]\n```";
        let value = extract_json(fenced).unwrap();
        assert_eq!(value[0]["title"], "Cook at home");

        let tagless = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(tagless).unwrap()["a"], 1);
    }

    #[test]
    fn extract_json_handles_bare_payloads() {
        let value = extract_json("  [1, 2, 3] ").unwrap();
        assert_eq!(value, serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn extract_json_rejects_prose() {
        assert!(extract_json("Here are some ideas for you!").is_none());
        assert!(extract_json("```\nnot json\n```").is_none());
    }
}
