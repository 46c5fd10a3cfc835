use room_planner::RoomConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = room_planner::RoomApp::new(RoomConfig::default())?;
    app.run()
}
