//! softraster viewer
//!
//! Renders a lit, textured model on the CPU every frame and blits the result
//! into a macroquad window.
//!
//! Controls: drag with the left mouse button to look around, hold the right
//! button to zoom, WASD to move, F to toggle the wireframe overlay, Escape
//! to quit. An optional argument names the RON config (default `viewer.ron`).

use std::process;

use macroquad::prelude::*;
use softraster::rasterizer::Color as RasterColor;
use softraster::{scene, CameraInput, Context, Mat4, ViewerConfig, VERSION};

const DEFAULT_CONFIG: &str = "viewer.ron";

fn window_conf(config: &ViewerConfig) -> Conf {
    Conf {
        window_title: format!("softraster v{}", VERSION),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

fn gather_input() -> CameraInput {
    CameraInput {
        cursor: mouse_position(),
        rotate: is_mouse_button_down(MouseButton::Left),
        zoom: is_mouse_button_down(MouseButton::Right),
        forward: is_key_down(KeyCode::W),
        backward: is_key_down(KeyCode::S),
        left: is_key_down(KeyCode::A),
        right: is_key_down(KeyCode::D),
    }
}

async fn run(config: ViewerConfig) {
    let model = match config.load_model() {
        Ok(model) => model,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };
    let material = match config.load_material() {
        Ok(material) => material,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    let mut context = Context::new(config.width, config.height);
    let mut camera = config.camera();
    let mut show_wireframe = false;

    let texture = Texture2D::from_rgba8(
        config.width as u16,
        config.height as u16,
        &context.color_buffer().to_rgba8(),
    );
    texture.set_filter(FilterMode::Nearest);

    log::info!("Viewer running ({} faces)", model.num_faces());

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::F) {
            show_wireframe = !show_wireframe;
        }

        camera.process_input(&gather_input(), get_frame_time());

        let model_matrix = Mat4::rotation_y(get_time() as f32 * config.spin_speed);
        context.clear();
        scene::draw_model(
            &mut context,
            &camera,
            &model,
            &material,
            &config.lighting,
            &model_matrix,
        );

        // Overlay goes on a copy; the context keeps only shaded fragments
        let mut frame = context.color_buffer().clone();
        if show_wireframe {
            for outline in scene::wireframe(&context, &camera, &model, &model_matrix) {
                frame.draw_triangle(outline, RasterColor::GREEN);
            }
        }
        texture.update_from_bytes(frame.width as u32, frame.height as u32, &frame.to_rgba8());

        clear_background(BLACK);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );
        draw_text(
            &format!(
                "{} fps | fovy {:.0} | wireframe {}",
                get_fps(),
                camera.fovy(),
                if show_wireframe { "on" } else { "off" }
            ),
            8.0,
            20.0,
            18.0,
            Color::from_rgba(200, 200, 200, 255),
        );

        next_frame().await;
    }

    context.release();
    log::info!("Viewer closed");
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = match ViewerConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    log::info!("Starting softraster viewer {}x{}", config.width, config.height);
    macroquad::Window::from_config(window_conf(&config), run(config));
}
