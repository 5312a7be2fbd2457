//! Recommendation copy templates.
//!
//! Fixed advice text per rule tier. The text is opaque templated content —
//! only the rule engine's category/priority selection is logic. Copy is
//! grouped by rule group in evaluation order.

/// Advice text for one recommendation record.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationCopy {
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
    pub expected_impact: &'static str,
}

// === Group 1: completion velocity ===

pub const VELOCITY_LOW_TIER: RecommendationCopy = RecommendationCopy {
    title: "Raise Your Completion Speed",
    description: "Task completion speed is still low. Focus on study efficiency.",
    action: "Set a daily target of finishing at least 2-3 modules",
    expected_impact: "Can lift completion velocity by up to 40%",
};

pub const VELOCITY_MID_TIER: RecommendationCopy = RecommendationCopy {
    title: "Optimize Your Learning Pace",
    description: "Completion speed is decent, but there is room to improve.",
    action: "Use time-blocking to stay fully focused each session",
    expected_impact: "Improves efficiency by up to 25%",
};

pub const VELOCITY_TOP_TIER: RecommendationCopy = RecommendationCopy {
    title: "Excellent Completion Speed",
    description: "You work through material very efficiently.",
    action: "Move on to more challenging material for growth",
    expected_impact: "Accelerates learning progress by 30%",
};

// === Group 2: login regularity ===

pub const LOGIN_GAP_IRREGULAR: RecommendationCopy = RecommendationCopy {
    title: "Improve Login Consistency",
    description: "Your login pattern is irregular. Consistency is the key to effective learning.",
    action: "Set a fixed study time at the same hour every day",
    expected_impact: "Can improve retention by up to 50%",
};

pub const LOGIN_GAP_WOBBLY: RecommendationCopy = RecommendationCopy {
    title: "Stabilize Your Study Pattern",
    description: "Login consistency is decent but could be steadier.",
    action: "Set a daily reminder and stick to the schedule",
    expected_impact: "Improves consistency by up to 30%",
};

pub const LOGIN_GAP_STEADY: RecommendationCopy = RecommendationCopy {
    title: "Very Consistent Login Pattern",
    description: "Your login pattern is steady and regular.",
    action: "Keep the routine and focus on session quality",
    expected_impact: "Maintains optimal learning momentum",
};

// === Group 3: study time per module ===

pub const STUDY_TIME_TOO_SHORT: RecommendationCopy = RecommendationCopy {
    title: "Extend Your Study Sessions",
    description: "Time per module is too short for deep understanding.",
    action: "Increase session length to at least 20-30 minutes per module",
    expected_impact: "Improves comprehension by up to 60%",
};

pub const STUDY_TIME_BELOW_OPTIMAL: RecommendationCopy = RecommendationCopy {
    title: "Optimize Study Duration",
    description: "Session length is adequate but could be more effective.",
    action: "Try the Pomodoro technique: 25 minutes focused + 5 minutes break",
    expected_impact: "Improves focus and retention by up to 35%",
};

pub const STUDY_TIME_TOO_LONG: RecommendationCopy = RecommendationCopy {
    title: "Watch Your Study Efficiency",
    description: "Sessions run long; make sure they stay effective.",
    action: "Break material into smaller parts and take regular breaks",
    expected_impact: "Prevents burnout and lifts productivity by 25%",
};

pub const STUDY_TIME_IDEAL: RecommendationCopy = RecommendationCopy {
    title: "Ideal Study Duration",
    description: "Your time per module is right in the optimal band.",
    action: "Keep this rhythm and vary your study methods",
    expected_impact: "Maintains optimal performance",
};

// === Group 4: weekend schedule ===

pub const WEEKEND_UNDERUSED: RecommendationCopy = RecommendationCopy {
    title: "Use Your Weekends",
    description: "You rarely study on weekends. They are a good slot for weekly review.",
    action: "Reserve 1-2 weekend hours for reviewing the week's material",
    expected_impact: "Improves retention by up to 30%",
};

pub const WEEKEND_HEAVY: RecommendationCopy = RecommendationCopy {
    title: "Balance Weekend and Weekday",
    description: "Most of your studying happens on weekends.",
    action: "Spread sessions across weekdays for steadier progress",
    expected_impact: "Improves daily consistency by 20%",
};

// === Group 5: night schedule ===

pub const NIGHT_HEAVY: RecommendationCopy = RecommendationCopy {
    title: "Reconsider Your Study Hours",
    description: "You often study late at night. A different slot may serve you better.",
    action: "Shift part of your sessions to morning or afternoon",
    expected_impact: "Improves focus and retention by up to 25%",
};

pub const NIGHT_RARE: RecommendationCopy = RecommendationCopy {
    title: "Good Study-Hour Pattern",
    description: "You study at hours that favor focus.",
    action: "Keep this pattern and use your peak energy hours",
    expected_impact: "Maintains optimal productivity",
};

// === Group 6: persona ===

pub const PERSONA_CONSISTENT: RecommendationCopy = RecommendationCopy {
    title: "Leverage Your Consistency",
    description: "As a consistent learner you have a strong foundation.",
    action: "Start tackling advanced material and mentor your peers",
    expected_impact: "Deepens understanding through teaching by 40%",
};

pub const PERSONA_SPRINTER: RecommendationCopy = RecommendationCopy {
    title: "Balance Speed with Depth",
    description: "You grasp material quickly, but make sure not to skip the details.",
    action: "Add review sessions to lock in deep understanding",
    expected_impact: "Improves long-term retention by 35%",
};

pub const PERSONA_WARRIOR: RecommendationCopy = RecommendationCopy {
    title: "Channel Energy into Strategy",
    description: "High drive needs the right strategy behind it.",
    action: "Focus on challenging material and build a structured study plan",
    expected_impact: "Maximizes learning outcomes by up to 45%",
};

// === Group 7: overall performance tier ===

pub const OVERALL_IMPROVEMENT: RecommendationCopy = RecommendationCopy {
    title: "Action Plan for Improvement",
    description: "Your performance needs an across-the-board lift.",
    action: "Work the 2-3 high-priority recommendations above for two weeks",
    expected_impact: "Up to 50% performance gain within a month",
};

pub const OVERALL_PUSH: RecommendationCopy = RecommendationCopy {
    title: "Push to the Next Level",
    description: "Performance is decent. Time to move up a level.",
    action: "Pick 1-2 improvement areas and stay on them for three weeks",
    expected_impact: "Reaches excellent performance within a month",
};

pub const OVERALL_MAINTAIN: RecommendationCopy = RecommendationCopy {
    title: "Maintain Excellence",
    description: "Your performance is already strong.",
    action: "Focus on continuous improvement and explore advanced material",
    expected_impact: "Become a top performer and role model",
};
