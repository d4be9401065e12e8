// main.rs
mod assets;
mod player;
mod process_events;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use raylib::prelude::*;

use voxelscape::render::{SCREEN_HEIGHT, SCREEN_WIDTH};
use voxelscape::{CameraUpdate, Renderer, SceneConfig};

use player::Player;
use process_events::process_events;

#[derive(Parser, Debug)]
#[command(name = "voxelscape", about = "Voxel-space terrain viewer")]
struct Args {
    /// Scene description (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window pixels per frame pixel
    #[arg(long, default_value_t = 3)]
    scale: i32,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    let mut renderer = Renderer::new();
    // Centro del tile principal salvo que la config diga otra cosa.
    renderer.set_camera(CameraUpdate::new().x(1536.0).z(1536.0).y(240.0));
    assets::populate(&mut renderer, &config)?;
    config.apply(&mut renderer)?;

    let scale = args.scale.clamp(1, 8);
    let window_width = SCREEN_WIDTH as i32 * scale;
    let window_height = SCREEN_HEIGHT as i32 * scale;

    let (mut window, raylib_thread) = raylib::init()
        .size(window_width, window_height)
        .title("voxelscape")
        .build();
    window.set_target_fps(60);

    let blank = Image::gen_image_color(SCREEN_WIDTH as i32, SCREEN_HEIGHT as i32, Color::BLACK);
    let mut screen = window.load_texture_from_image(&raylib_thread, &blank)?;

    let mut player = Player::new(renderer.camera());

    while !window.window_should_close() {
        process_events(&mut window, &mut player, &mut renderer);

        renderer.render().upload_to_texture(&mut screen);

        let fps_now = window.get_fps();
        let pose = renderer.camera();
        let sprint_on = player.sprinting;

        let mut d = window.begin_drawing(&raylib_thread);
        d.clear_background(Color::BLACK);
        d.draw_texture_ex(&screen, Vector2::new(0.0, 0.0), 0.0, scale as f32, Color::WHITE);
        d.draw_text(&format!("FPS: {fps_now}"), 10, 10, 20, Color::WHITE);
        d.draw_text(
            &format!("{}° ({}, {}, {}) h={}", pose.angle, pose.x, pose.z, pose.y, renderer.height_at(pose.x as i64, pose.z as i64)),
            10,
            34,
            20,
            Color::WHITE,
        );
        if sprint_on {
            d.draw_text("SPRINT", 10, 58, 20, Color::RED);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
