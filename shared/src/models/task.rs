//! Task models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Priority;

/// A task as returned by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiTask {
    #[serde(default)]
    pub text: String,
    /// Suggested time of day, e.g. "Morning" or "After 4 PM"
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub priority: Priority,
}

/// A task held in the farmer's task list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl From<AiTask> for Task {
    fn from(task: AiTask) -> Self {
        let due_date = Some(task.time).filter(|t| !t.trim().is_empty());
        Self {
            id: Uuid::new_v4().to_string(),
            text: task.text,
            completed: false,
            priority: task.priority,
            due_date,
        }
    }
}

/// Ordered task list; tasks are never deleted, only replaced wholesale
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with freshly generated tasks
    pub fn replace_from_ai(&mut self, tasks: Vec<AiTask>) {
        self.tasks = tasks.into_iter().map(Task::from).collect();
    }

    /// Add a single task at the top of the list
    pub fn prepend(&mut self, task: AiTask) -> Task {
        let task = Task::from(task);
        self.tasks.insert(0, task.clone());
        task
    }

    /// Flip the completion flag of a task
    pub fn toggle(&mut self, id: &str) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        Some(task)
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }
}

/// Seven-day task plan keyed `day1` through `day7`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyTasks {
    pub day1: Vec<AiTask>,
    pub day2: Vec<AiTask>,
    pub day3: Vec<AiTask>,
    pub day4: Vec<AiTask>,
    pub day5: Vec<AiTask>,
    pub day6: Vec<AiTask>,
    pub day7: Vec<AiTask>,
}

impl WeeklyTasks {
    pub const DAY_KEYS: [&'static str; 7] = ["day1", "day2", "day3", "day4", "day5", "day6", "day7"];

    /// Days in order, paired with their key
    pub fn days(&self) -> [(&'static str, &[AiTask]); 7] {
        [
            ("day1", &self.day1),
            ("day2", &self.day2),
            ("day3", &self.day3),
            ("day4", &self.day4),
            ("day5", &self.day5),
            ("day6", &self.day6),
            ("day7", &self.day7),
        ]
    }

    pub fn total_tasks(&self) -> usize {
        self.days().iter().map(|(_, tasks)| tasks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ai_task(text: &str, time: &str, priority: Priority) -> AiTask {
        AiTask {
            text: text.to_string(),
            time: time.to_string(),
            priority,
        }
    }

    #[test]
    fn test_ai_task_missing_priority_defaults_to_medium() {
        let task: AiTask = serde_json::from_str(r#"{"text": "Weed the beds", "time": "Morning"}"#).unwrap();
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_task_from_ai_task() {
        let task = Task::from(ai_task("Spray neem oil", "Evening", Priority::High));
        assert!(!task.completed);
        assert_eq!(task.due_date.as_deref(), Some("Evening"));
        assert_eq!(task.priority, Priority::High);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_replace_and_prepend() {
        let mut list = TaskList::new();
        list.replace_from_ai(vec![
            ai_task("Check drainage", "Morning", Priority::High),
            ai_task("Mulch", "Afternoon", Priority::Low),
        ]);
        assert_eq!(list.len(), 2);

        let added = list.prepend(ai_task("Buy fertilizer", "", Priority::Medium));
        assert_eq!(list.as_slice()[0].id, added.id);
        assert_eq!(added.due_date, None);
        assert_eq!(list.len(), 3);

        list.replace_from_ai(vec![]);
        assert!(list.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut list = TaskList::new();
        let task = list.prepend(ai_task("Harvest", "Morning", Priority::High));

        assert!(list.toggle(&task.id).unwrap().completed);
        assert_eq!(list.pending_count(), 0);
        assert!(!list.toggle(&task.id).unwrap().completed);
        assert!(list.toggle("missing").is_none());
    }

    #[test]
    fn test_weekly_tasks_shape() {
        let json = r#"{
            "day1": [{"text": "a", "time": "Morning", "priority": "high"}],
            "day2": [], "day3": [], "day4": [], "day5": [], "day6": [],
            "day7": [{"text": "b", "time": "Evening", "priority": "low"}]
        }"#;
        let weekly: WeeklyTasks = serde_json::from_str(json).unwrap();
        assert_eq!(weekly.total_tasks(), 2);
        assert_eq!(weekly.days()[6].0, "day7");
    }
}
