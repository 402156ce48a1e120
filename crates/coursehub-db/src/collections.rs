pub enum Collections {
    Courses,
    Lectures,
    Users,
}

impl Collections {
    pub fn as_str(&self) -> &str {
        match *self {
            Collections::Courses => "courses",
            Collections::Lectures => "lectures",
            Collections::Users => "users",
        }
    }
}
