mod calendar_day_cell;
mod calendar_grid;
mod task_list;
mod task_list_row;

pub use calendar_day_cell::CalendarDayCell;
pub use calendar_grid::CalendarGrid;
pub use task_list::TaskList;
pub use task_list_row::TaskListRow;
