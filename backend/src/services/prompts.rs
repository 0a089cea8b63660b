//! Prompt templates
//!
//! Every prompt is written once in English. The farmer's language enters as a
//! reply-language directive, the localized district name and the localized
//! "not selected yet" crop placeholder.

use shared::i18n;
use shared::{Language, Profile, SoilData};

/// Reply-language rule appended to every prompt
fn language_directive(lang: Language) -> String {
    let name = lang.english_name();
    format!(
        "You MUST respond ONLY in {name}. Every string value in your answer must be written in {name}."
    )
}

fn crop_label(profile: &Profile, lang: Language) -> String {
    if profile.has_crop() {
        profile.crop.clone()
    } else {
        i18n::catalog(lang).crop_not_selected.to_string()
    }
}

/// Short profile block used by the structured prompts
fn crop_and_location(profile: &Profile, lang: Language) -> String {
    format!(
        "Farmer Profile:\n- Main Crop: {}\n- Location (District): {}",
        crop_label(profile, lang),
        i18n::district_name(lang, &profile.district)
    )
}

/// System instruction for the chat assistant
pub fn system_instruction(profile: &Profile, lang: Language) -> String {
    let language = lang.english_name();
    format!(
        r#"You are "Krishi Sakhi," a friendly, expert AI farming assistant for farmers in Kerala.
Your primary language of communication MUST be {language}.
You may receive queries in {language}, English or Malayalam, typed or transcribed from voice.
{directive} Use a simple, clear and encouraging tone.
Your goal is to provide personalized, actionable advice based on the farmer's specific context.

Here is the farmer's profile:
- Name: {name}
- Location (District): {district}
- Land Size: {land_size}
- Main Crop: {crop}
- Soil Type: {soil_type}
- Irrigation Method: {irrigation}

Use this profile to tailor your advice.
When the farmer logs an activity, acknowledge it and offer relevant next steps.
Keep your answers concise, clear and easy for a farmer to understand.

CAPABILITY (Image Analysis): If the user uploads a plant image, identify diseases or pests. Describe the symptoms and treatment options. If the image is unclear, say that you cannot analyze it.

CAPABILITY (Task Management): If the user asks to add a task, respond with ONLY a JSON object in this format. Do not add any other text.
{{"action": "addTask", "task": {{"text": "The task description in {language}", "priority": "medium", "time": "Anytime"}}}}

For all other queries, respond naturally and ONLY in {language}."#,
        language = language,
        directive = language_directive(lang),
        name = profile.name,
        district = i18n::district_name(lang, &profile.district),
        land_size = profile.land_size,
        crop = crop_label(profile, lang),
        soil_type = profile.soil_type,
        irrigation = profile.irrigation,
    )
}

pub fn daily_tasks(profile: &Profile, lang: Language) -> String {
    format!(
        r#"As "Krishi Sakhi", generate a personalized list of 3-4 simple, actionable daily tasks for a farmer. Consider a plausible weather forecast for their location. For example, do not suggest watering if rain is likely.

{profile}

For each task, provide a short text description, a suggested time (e.g., "Morning", "After 4 PM"), and a priority ('high', 'medium', or 'low').
Return the response ONLY as a JSON object with a single key "tasks", which is an array of task objects.
{directive}"#,
        profile = crop_and_location(profile, lang),
        directive = language_directive(lang),
    )
}

pub fn weekly_tasks(profile: &Profile, lang: Language) -> String {
    format!(
        r#"As "Krishi Sakhi", create a 7-day task plan for a farmer. The tasks must be relevant to their crop and location, considering the plausible weather for the week. For each day, provide 2-3 simple tasks.

{profile}

For each task, provide a short text description, a suggested time, and a priority ('high', 'medium', 'low').
Return the response ONLY as a JSON object with keys "day1" through "day7". Each key's value is an array of task objects.
{directive}"#,
        profile = crop_and_location(profile, lang),
        directive = language_directive(lang),
    )
}

pub fn dashboard_advice(profile: &Profile, lang: Language) -> String {
    format!(
        r#"As an expert farm manager AI named "Krishi Sakhi", generate a personalized title and a list of 2-3 concise, actionable tips for a farmer. The advice should be highly relevant to their main crop, location, and the current season (assume it's the present day).

{profile}

The title should be engaging. The tips should be practical.
Return the response ONLY as a JSON object with "title" (string) and "advice" (an array of strings).
{directive}"#,
        profile = crop_and_location(profile, lang),
        directive = language_directive(lang),
    )
}

pub fn market_price(profile: &Profile, lang: Language) -> String {
    format!(
        r#"As a market data provider AI, generate a realistic, single market price update for a farmer. The price should be for their main crop in a plausible local market within their district.

{profile}

Return the response ONLY as a JSON object with "cropName" (string), "price" (string, e.g., "₹3,500"), "unit" (string, e.g., "per quintal"), "market" (string, a plausible local market name), and "trend" ('up', 'down', or 'stable').
{directive} Keep "trend" as one of the English words 'up', 'down' or 'stable'."#,
        profile = crop_and_location(profile, lang),
        directive = language_directive(lang),
    )
}

pub fn soil_recommendations(soil: &SoilData, lang: Language) -> String {
    format!(
        r#"Analyze the following soil data and provide personalized crop recommendations for a farmer in India.

Soil Data:
- pH Level: {ph}
- Electrical Conductivity: {ec} dS/m
- Organic Carbon: {oc} %
- Soil Type: {soil_type}
- Nitrogen (N): {n} kg/ha
- Phosphorus (P): {p} kg/ha
- Potassium (K): {k} kg/ha
- Calcium (Ca): {ca} ppm
- Magnesium (Mg): {mg} ppm
- Sulphur (S): {s} ppm

Based on this data, recommend exactly 3 suitable crops with the following constraints on their harvest duration:
1. One short-term crop with a harvest duration of approximately 90 days.
2. One long-term crop with a harvest duration of approximately 200 days.
3. One other suitable crop with a flexible duration.

The duration string for each crop must clearly state the number of days (e.g., "90-100 days", "Approx. 200 days").
Return the response as a JSON object containing a single key "recommendations" which is an array of exactly 3 crop recommendation objects.
{directive}"#,
        ph = soil.ph,
        ec = soil.ec,
        oc = soil.oc,
        soil_type = soil.soil_type,
        n = soil.n,
        p = soil.p,
        k = soil.k,
        ca = soil.ca,
        mg = soil.mg,
        s = soil.s,
        directive = language_directive(lang),
    )
}
