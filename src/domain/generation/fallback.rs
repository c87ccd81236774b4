//! Static itinerary returned when every backend fails

/// Upper bound on the fallback text, in characters
pub const FALLBACK_MAX_CHARS: usize = 1000;

const FALLBACK_BODY: &str = "
**Day 1: Hanoi - Romantic City Exploration**
- Morning: Stroll around Hoan Kiem Lake.
- Afternoon: Visit the Temple of Literature.
- Evening: Rooftop dinner in the Old Quarter.

**Day 2: Ha Long Bay - Scenic Cruise**
- Morning: Board a luxury cruise.
- Afternoon: Explore caves and emerald waters.
- Evening: Sunset dinner on deck.

**Day 3: Hoi An - Charming Ancient Town**
- Morning: Explore lantern-lit streets.
- Afternoon: Boat ride on Thu Bon River.
- Evening: Riverside local cuisine.

**Day 4: Ho Chi Minh City - Vibrant Romance**
- Morning: Notre-Dame Basilica visit.
- Afternoon: Couple's spa.
- Evening: Rooftop cocktails with city views.
";

/// Fixed four-day itinerary; only the header reflects `day_count`.
pub fn fallback_itinerary(day_count: u32) -> String {
    let text = format!(
        "\n# Romantic {}-Day Itinerary for Vietnam\n{}",
        day_count, FALLBACK_BODY
    );

    text.chars().take(FALLBACK_MAX_CHARS).collect()
}
